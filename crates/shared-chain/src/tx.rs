//! EIP-155 legacy transactions.

use crate::errors::ChainError;
use primitive_types::U256;
use rlp::RlpStream;
use shared_crypto::Wallet;
use shared_types::{keccak256, Address, Hash};

/// Unsigned legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl LegacyTransaction {
    fn append_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        stream.append(&self.to.as_bytes().to_vec());
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// `keccak256(rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]))`
    pub fn signing_hash(&self) -> Hash {
        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        keccak256(&stream.out())
    }

    /// Sign and return the raw transaction bytes.
    pub fn sign(&self, wallet: &Wallet) -> Result<Vec<u8>, ChainError> {
        let signature = wallet.sign_prehash(&self.signing_hash())?;
        let v = u64::from(signature.recovery_byte()?) + 35 + self.chain_id * 2;

        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&v);
        stream.append(&U256::from_big_endian(&signature.r));
        stream.append(&U256::from_big_endian(&signature.s));
        Ok(stream.out().to_vec())
    }
}
