//! Implementation of a PRG based on AES-CTR.
//!
//! The idea is that a pseudo-random block of bits is generated by computing
//!    $$\textsf{Block} = \textsf{AES}(\textsf{Seed}, \textsf{CurrentCounter})$$
//! where $\textsf{CurrentCounter} = \textsf{Nonce} \Vert \textsf{Counter}$, and the counter
//! is increased when a new block is generated.
//!
//! The generator is the only source of randomness in the crate. Protocol
//! functions receive it as an explicit `&mut` parameter instead of reaching
//! for a process-global generator, so a seeded instance can reproduce a full
//! protocol run in tests while deployments seed from the operating system
//! via [`Prg::from_entropy`].

use aes::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};

type Aes128Ctr64LE = ctr::Ctr64LE<aes::Aes128>;

/// Defines a pseudo-random number generator.
pub struct Prg {
    seed: Vec<u8>,
    counter: u64,
}

impl Prg {
    const PRG_NONCE: u64 = 0x0123456789ABCDEF;
    const PRG_INITIAL_COUNTER: u64 = 0;

    // All the lengths are in bytes
    const KEY_LEN: usize = 16;
    const IV_LEN: usize = 16;
    const BLOCK_LEN: usize = 16;

    /// Creates a new PRG from an explicit seed.
    ///
    /// If the seed is longer than the key material for the encryption
    /// scheme, it is cropped to fit in the specification. If the seed is
    /// shorter than expected, it is padded with zeros. The seed will be
    /// divided in two halves to generate the encryption key and the
    /// initialization vector for the CTR mode.
    ///
    /// An explicit seed makes a protocol run reproducible and belongs in
    /// tests. Production instances must come from [`Prg::from_entropy`].
    pub fn new(seed: &[u8]) -> Prg {
        let mut cropped_seed = seed[..seed.len().min(Self::KEY_LEN + Self::IV_LEN)].to_vec();
        cropped_seed.resize(Self::KEY_LEN + Self::IV_LEN, 0);

        let mut prg = Prg {
            seed: cropped_seed,
            counter: Self::PRG_INITIAL_COUNTER,
        };
        prg.init();
        prg
    }

    /// Creates a new PRG seeded from the operating system entropy source.
    ///
    /// Fails with [`Error::Entropy`] when the entropy source cannot be
    /// read. There is no fallback to a weaker generator.
    pub fn from_entropy() -> Result<Prg> {
        let mut seed = vec![0u8; Self::KEY_LEN + Self::IV_LEN];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| Error::Entropy(e.to_string()))?;

        Ok(Self::new(&seed))
    }

    /// Initializes the PRG.
    pub fn init(&mut self) {
        self.counter = Self::PRG_INITIAL_COUNTER;
    }

    /// Resets the PRG.
    pub fn reset(&mut self) {
        self.init()
    }

    /// Returns the current state of the counter in the PRG.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Generates a stream of random bytes.
    ///
    /// The method divides the seed into two halves: the first part will be used
    /// as the key for the AES encryption and the second part will be used as
    /// the initialization vector for the encryption.
    pub fn next(&mut self, n_bytes: usize) -> Vec<u8> {
        if n_bytes == 0 {
            return Vec::new();
        }

        // Compute the number of blocks needed
        let mut n_blocks = n_bytes / Self::BLOCK_LEN;
        if n_bytes % Self::BLOCK_LEN != 0 {
            n_blocks += 1;
        }

        let key = &self.seed[0..Self::KEY_LEN];
        let iv = &self.seed[Self::KEY_LEN..];

        let mut cipher = Aes128Ctr64LE::new(key.into(), iv.into());

        let mut out = Vec::new();
        for _ in 0..n_blocks {
            let mut buffer = [Self::PRG_NONCE.to_ne_bytes(), self.counter.to_ne_bytes()].concat();
            cipher.apply_keystream(&mut buffer);
            out.append(&mut buffer);

            self.counter += 1;
        }

        out[..n_bytes].to_vec()
    }
}

impl RngCore for Prg {
    fn next_u32(&mut self) -> u32 {
        let mut buffer = [0u8; 4];
        self.fill_bytes(&mut buffer);
        u32::from_le_bytes(buffer)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buffer = [0u8; 8];
        self.fill_bytes(&mut buffer);
        u64::from_le_bytes(buffer)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let stream = self.next(dest.len());
        dest.copy_from_slice(&stream);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for Prg {}
