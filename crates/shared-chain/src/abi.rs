//! # Solidity ABI Codec
//!
//! Head/tail encoding for the value types the adapters exchange with
//! contracts: unsigned integers, addresses, bools, strings, bytes, dynamic
//! arrays and tuples.

use crate::errors::AbiError;
use primitive_types::U256;
use shared_types::{keccak256, Address, Hash};

const WORD: usize = 32;

/// ABI type descriptor, used for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Uint,
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Array(Box<ParamType>),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    fn is_dynamic(&self) -> bool {
        match self {
            ParamType::String | ParamType::Bytes | ParamType::Array(_) => true,
            ParamType::Tuple(inner) => inner.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Inline size of a static type.
    fn head_len(&self) -> usize {
        match self {
            ParamType::Tuple(inner) if !self.is_dynamic() => {
                inner.iter().map(ParamType::head_len).sum()
            }
            _ => WORD,
        }
    }
}

/// ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Address(Address),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Array(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        match self {
            Token::String(_) | Token::Bytes(_) | Token::Array(_) => true,
            Token::Tuple(inner) => inner.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    fn head_len(&self) -> usize {
        match self {
            Token::Tuple(inner) if !self.is_dynamic() => inner.iter().map(Token::head_len).sum(),
            _ => WORD,
        }
    }

    pub fn into_uint(self) -> Result<U256, AbiError> {
        match self {
            Token::Uint(v) => Ok(v),
            _ => Err(AbiError::UnexpectedToken("uint")),
        }
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            Token::String(v) => Ok(v),
            _ => Err(AbiError::UnexpectedToken("string")),
        }
    }

    pub fn into_array(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Token::Array(v) => Ok(v),
            _ => Err(AbiError::UnexpectedToken("array")),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Token::Tuple(v) => Ok(v),
            _ => Err(AbiError::UnexpectedToken("tuple")),
        }
    }
}

/// Function selector: first four bytes of the keccak of the signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic hash of an event signature.
pub fn event_topic(signature: &str) -> Hash {
    keccak256(signature.as_bytes())
}

/// Calldata for `signature` with `tokens` as arguments.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(tokens));
    out
}

/// Encode `tokens` as a tuple.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let heads_len: usize = tokens.iter().map(Token::head_len).sum();
    let mut head = Vec::with_capacity(heads_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word(U256::from(heads_len + tail.len())));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }

    head.extend(tail);
    head
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Uint(v) => uint_word(*v).to_vec(),
        Token::Address(a) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(a.as_bytes());
            word.to_vec()
        }
        Token::Bool(b) => uint_word(U256::from(u8::from(*b))).to_vec(),
        Token::FixedBytes(bytes) => padded(bytes),
        Token::String(s) => encode_bytes(s.as_bytes()),
        Token::Bytes(bytes) => encode_bytes(bytes),
        Token::Array(items) => {
            let mut out = uint_word(U256::from(items.len())).to_vec();
            out.extend(encode(items));
            out
        }
        Token::Tuple(items) => encode(items),
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = uint_word(U256::from(bytes.len())).to_vec();
    out.extend(padded(bytes));
    out
}

fn padded(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let rem = out.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
    out
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

/// Decode `data` as a tuple of `types`.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_tuple(types, data, 0)
}

fn decode_tuple(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut cursor = base;

    for param in types {
        if param.is_dynamic() {
            let offset = read_usize(data, cursor)?;
            let at = base.checked_add(offset).ok_or(AbiError::InvalidOffset(cursor))?;
            tokens.push(decode_value(param, data, at)?);
            cursor += WORD;
        } else {
            tokens.push(decode_value(param, data, cursor)?);
            cursor += param.head_len();
        }
    }

    Ok(tokens)
}

fn decode_value(param: &ParamType, data: &[u8], at: usize) -> Result<Token, AbiError> {
    match param {
        ParamType::Uint => Ok(Token::Uint(U256::from_big_endian(read_word(data, at)?))),
        ParamType::Address => {
            let word = read_word(data, at)?;
            let mut address = [0u8; 20];
            address.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address(address)))
        }
        ParamType::Bool => match U256::from_big_endian(read_word(data, at)?) {
            v if v.is_zero() => Ok(Token::Bool(false)),
            v if v == U256::one() => Ok(Token::Bool(true)),
            _ => Err(AbiError::InvalidBool),
        },
        ParamType::FixedBytes(len) => {
            let word = read_word(data, at)?;
            Ok(Token::FixedBytes(word[..(*len).min(WORD)].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(read_bytes(data, at)?.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, at)?;
            let s = std::str::from_utf8(bytes).map_err(|_| AbiError::InvalidUtf8)?;
            Ok(Token::String(s.to_string()))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, at)?;
            let start = at + WORD;
            // Every element needs at least one word, which bounds the allocation
            if len > data.len().saturating_sub(start) / WORD {
                return Err(AbiError::InvalidOffset(at));
            }
            let types = vec![(**inner).clone(); len];
            Ok(Token::Array(decode_tuple(&types, data, start)?))
        }
        ParamType::Tuple(inner) => Ok(Token::Tuple(decode_tuple(inner, data, at)?)),
    }
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let end = at.checked_add(WORD).ok_or(AbiError::InvalidOffset(at))?;
    data.get(at..end).ok_or(AbiError::Truncated(at))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, at)?);
    if value.bits() > 32 {
        return Err(AbiError::InvalidOffset(at));
    }
    Ok(value.low_u64() as usize)
}

fn read_bytes(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(data, at)?;
    let start = at + WORD;
    let end = start.checked_add(len).ok_or(AbiError::InvalidOffset(at))?;
    data.get(start..end).ok_or(AbiError::Truncated(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(n: u64) -> String {
        format!("{:064x}", n)
    }

    #[test]
    fn test_selectors() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector("startChat(string,string[])")), "ca3ce8d1");
        assert_eq!(hex::encode(selector("getMessageHistory(uint256)")), "54a470fc");
    }

    #[test]
    fn test_static_arguments_inline() {
        let to = Address([0x35; 20]);
        let data = encode_call(
            "transfer(address,uint256)",
            &[Token::Address(to), Token::Uint(U256::from(1000))],
        );
        assert_eq!(
            hex::encode(data),
            format!("a9059cbb{}{}{}", "0".repeat(24), "35".repeat(20), word(1000))
        );
    }

    #[test]
    fn test_string_layout() {
        let encoded = encode(&[Token::String("hello".to_string())]);
        let expected = format!(
            "{}{}{}",
            word(0x20),
            word(5),
            format!("{}{}", hex::encode("hello"), "0".repeat(54))
        );
        assert_eq!(hex::encode(encoded), expected);
    }

    #[test]
    fn test_mixed_static_and_dynamic_heads() {
        // (string, bool): head = [offset, bool], tail = string
        let encoded = encode(&[Token::String("ab".into()), Token::Bool(true)]);
        assert_eq!(&hex::encode(&encoded[..32]), &word(0x40));
        assert_eq!(&hex::encode(&encoded[32..64]), &word(1));
        assert_eq!(&hex::encode(&encoded[64..96]), &word(2));
    }

    #[test]
    fn test_string_array_layout() {
        let encoded = encode(&[Token::Array(vec![Token::String("x".into())])]);
        let expected = [
            word(0x20),
            word(1),
            word(0x20),
            word(1),
            format!("78{}", "0".repeat(62)),
        ]
        .concat();
        assert_eq!(hex::encode(encoded), expected);
    }

    #[test]
    fn test_decode_nested_history_shape() {
        let content = Token::Array(vec![Token::Tuple(vec![
            Token::String("text".into()),
            Token::String("{\"isPhotoreal\":true}".into()),
        ])]);
        let messages = Token::Array(vec![
            Token::Tuple(vec![Token::String("user".into()), Token::Array(vec![])]),
            Token::Tuple(vec![Token::String("assistant".into()), content]),
        ]);
        let encoded = encode(std::slice::from_ref(&messages));

        let shape = ParamType::Array(Box::new(ParamType::Tuple(vec![
            ParamType::String,
            ParamType::Array(Box::new(ParamType::Tuple(vec![
                ParamType::String,
                ParamType::String,
            ]))),
        ])));
        let decoded = decode(&[shape], &encoded).unwrap();
        assert_eq!(decoded, vec![messages]);
    }

    #[test]
    fn test_static_tuple_is_inline() {
        let tuple = Token::Tuple(vec![Token::Uint(U256::from(7)), Token::Bool(false)]);
        let encoded = encode(&[tuple.clone(), Token::Uint(U256::from(9))]);
        assert_eq!(encoded.len(), 96);

        let decoded = decode(
            &[
                ParamType::Tuple(vec![ParamType::Uint, ParamType::Bool]),
                ParamType::Uint,
            ],
            &encoded,
        )
        .unwrap();
        assert_eq!(decoded, vec![tuple, Token::Uint(U256::from(9))]);
    }

    #[test]
    fn test_decode_rejects_truncated_and_hostile_lengths() {
        assert_eq!(
            decode(&[ParamType::Uint], &[0u8; 16]),
            Err(AbiError::Truncated(0))
        );

        let mut hostile = hex::decode(word(0x20)).unwrap();
        hostile.extend(hex::decode(word(u32::MAX as u64)).unwrap());
        assert!(decode(&[ParamType::Array(Box::new(ParamType::Uint))], &hostile).is_err());
        assert!(decode(&[ParamType::String], &hostile).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_bool() {
        let data = hex::decode(word(2)).unwrap();
        assert_eq!(decode(&[ParamType::Bool], &data), Err(AbiError::InvalidBool));
    }
}
