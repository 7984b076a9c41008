//! Shared ciphertext-stealing tail handling for [`crate::ecb`] and [`crate::cbc`].
//!
//! Both modes require `len >= 16` and, when the final segment is 17..31
//! octets, splice the encryption of the second-to-last block with the final
//! partial block (STB 34.101.31). `chained` selects whether each block is
//! additionally XORed with a running chain value before encryption /
//! after decryption (CBC) or left alone (ECB); both stolen blocks are
//! chained against the *same* pre-tail chain value, which is what avoids a
//! circular dependency between the two halves of the spliced pair.

use belt_block::cipher::{BlockCipherDecrypt, BlockCipherEncrypt};
use belt_block::util::xor_inplace;
use belt_block::{BeltBlock, Block};
use belt_error::{Error, Result};

fn read_block(buf: &[u8]) -> Block {
    let arr: [u8; 16] = buf[..16].try_into().unwrap();
    arr.into()
}

/// Encrypt `buf` in place. `chain` is read/written only when `chained` is set.
pub(crate) fn encrypt_cts(
    cipher: &BeltBlock,
    buf: &mut [u8],
    chain: &mut Block,
    chained: bool,
) -> Result<()> {
    let len = buf.len();
    if len < 16 {
        return Err(Error::BadLength);
    }

    let full_blocks = len / 16;
    let rem = len % 16;
    let plain_blocks = if rem == 0 { full_blocks } else { full_blocks - 1 };

    for i in 0..plain_blocks {
        let chunk = &mut buf[i * 16..i * 16 + 16];
        let mut block = read_block(chunk);
        if chained {
            xor_inplace(&mut block, chain);
        }
        cipher.encrypt_block(&mut block);
        chunk.copy_from_slice(&block);
        if chained {
            *chain = block;
        }
    }

    if rem > 0 {
        let pnm1_start = plain_blocks * 16;
        let pn_start = pnm1_start + 16;
        let chain_before = *chain;

        let mut c_star = read_block(&buf[pnm1_start..pnm1_start + 16]);
        if chained {
            xor_inplace(&mut c_star, &chain_before);
        }
        cipher.encrypt_block(&mut c_star);

        let mut spliced = Block::default();
        spliced[..rem].copy_from_slice(&buf[pn_start..pn_start + rem]);
        spliced[rem..].copy_from_slice(&c_star[rem..]);
        if chained {
            xor_inplace(&mut spliced, &chain_before);
        }
        cipher.encrypt_block(&mut spliced);

        buf[pnm1_start..pnm1_start + rem].copy_from_slice(&c_star[..rem]);
        buf[pnm1_start + rem..pnm1_start + rem + 16].copy_from_slice(&spliced);

        if chained {
            *chain = spliced;
        }
    }

    Ok(())
}

/// Mirror of [`encrypt_cts`] for decryption.
pub(crate) fn decrypt_cts(
    cipher: &BeltBlock,
    buf: &mut [u8],
    chain: &mut Block,
    chained: bool,
) -> Result<()> {
    let len = buf.len();
    if len < 16 {
        return Err(Error::BadLength);
    }

    let full_blocks = len / 16;
    let rem = len % 16;
    let plain_blocks = if rem == 0 { full_blocks } else { full_blocks - 1 };

    for i in 0..plain_blocks {
        let chunk = &mut buf[i * 16..i * 16 + 16];
        let c_block = read_block(chunk);
        let mut p_block = c_block;
        cipher.decrypt_block(&mut p_block);
        if chained {
            xor_inplace(&mut p_block, chain);
            *chain = c_block;
        }
        chunk.copy_from_slice(&p_block);
    }

    if rem > 0 {
        let pnm1_start = plain_blocks * 16;
        let pn_start = pnm1_start + rem;
        let chain_before = *chain;

        let c_n = &buf[pnm1_start..pnm1_start + rem];
        let c_final = read_block(&buf[pn_start..pn_start + 16]);

        let mut v = c_final;
        cipher.decrypt_block(&mut v);
        if chained {
            xor_inplace(&mut v, &chain_before);
        }

        // v = tail-plaintext (first `rem` octets) || C*[rem..16]
        let tail: Block = {
            let mut t = [0u8; 16];
            t[..rem].copy_from_slice(&v[..rem]);
            t.into()
        };

        let mut c_star = Block::default();
        c_star[..rem].copy_from_slice(c_n);
        c_star[rem..].copy_from_slice(&v[rem..]);

        let mut p_last_full = c_star;
        cipher.decrypt_block(&mut p_last_full);
        if chained {
            xor_inplace(&mut p_last_full, &chain_before);
        }

        buf[pnm1_start..pnm1_start + 16].copy_from_slice(&p_last_full);
        // overwritten below once the tail is written; reorder writes so the
        // shorter tail region doesn't get clobbered by the 16-byte write.
        let tail_bytes: [u8; 16] = tail.into();
        buf[pnm1_start + 16..pnm1_start + 16 + rem].copy_from_slice(&tail_bytes[..rem]);

        if chained {
            *chain = c_star;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use belt_block::cipher::KeyInit;

    #[test]
    fn ecb_cts_round_trips() {
        let cipher = BeltBlock::new_from_slice(&[0x42u8; 32]).unwrap();
        for total_len in [16usize, 17, 20, 31, 32, 33] {
            let mut buf: heapless::Buf = heapless::Buf::filled(total_len, 0xAB);
            let orig = buf.clone();
            let mut chain = Block::default();
            encrypt_cts(&cipher, buf.as_mut_slice(), &mut chain, false).unwrap();
            if total_len % 16 == 0 {
                assert_ne!(buf.as_slice(), orig.as_slice());
            }
            let mut chain2 = Block::default();
            decrypt_cts(&cipher, buf.as_mut_slice(), &mut chain2, false).unwrap();
            assert_eq!(buf.as_slice(), orig.as_slice(), "len {total_len}");
        }
    }

    #[test]
    fn rejects_short_buffers() {
        let cipher = BeltBlock::new_from_slice(&[0x11u8; 16]).unwrap();
        let mut buf = [0u8; 8];
        let mut chain = Block::default();
        assert_eq!(
            encrypt_cts(&cipher, &mut buf, &mut chain, false).unwrap_err(),
            Error::BadLength
        );
    }

    mod heapless {
        #[derive(Clone)]
        pub(crate) struct Buf {
            data: [u8; 64],
            len: usize,
        }

        impl Buf {
            pub(crate) fn filled(len: usize, byte: u8) -> Self {
                let mut data = [0u8; 64];
                for (i, b) in data.iter_mut().enumerate().take(len) {
                    *b = byte.wrapping_add(i as u8);
                }
                Self { data, len }
            }

            pub(crate) fn as_slice(&self) -> &[u8] {
                &self.data[..self.len]
            }

            pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
                &mut self.data[..self.len]
            }
        }
    }
}
