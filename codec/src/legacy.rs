//! Legacy (amino JSON) wire format.
//!
//! A signed transaction travels as
//!
//! ```text
//! {"type":"cosmos-sdk/StdTx","value":{"msg":[...],"fee":{...},"signatures":[...],"memo":"..."}}
//! ```
//!
//! Messages use the registry's legacy shape, fees are denominated in chain
//! denoms, public keys and signatures are base64. The format carries no
//! account number or sequence; parsing needs a nonce from elsewhere.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{PUBKEY_ED25519_TYPE, PUBKEY_SECP256K1_TYPE, STD_TX_TYPE};
use crate::error::{CodecError, Result};
use crate::nonce::Nonce;
use crate::registry::MessageRegistry;
use crate::types::{
    Amount, Fee, FullSignature, KeyAlgorithm, PublicKey, SignedTransaction, TokenInfo,
    UnsignedTransaction,
};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdPubKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: StdPubKey,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: Vec<Value>,
    pub fee: StdFee,
    #[serde(default)]
    pub signatures: Vec<StdSignature>,
    #[serde(default)]
    pub memo: String,
}

/// The `{"type", "value"}` wrapper around a [`StdTx`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedStdTx {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: StdTx,
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

fn find_by_ticker<'a>(tokens: &'a [TokenInfo], ticker: &str) -> Result<&'a TokenInfo> {
    tokens
        .iter()
        .find(|t| t.ticker == ticker)
        .ok_or_else(|| CodecError::UnknownToken {
            ticker: ticker.to_string(),
        })
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn amount_to_coin(amount: &Amount, tokens: &[TokenInfo]) -> Result<Coin> {
    let token = find_by_ticker(tokens, &amount.token_ticker)?;
    if token.fractional_digits != amount.fractional_digits {
        return Err(CodecError::FractionalDigits {
            ticker: token.ticker.clone(),
            expected: token.fractional_digits,
            got: amount.fractional_digits,
        });
    }
    if !is_decimal(&amount.quantity) {
        return Err(CodecError::Malformed(format!(
            "amount quantity {:?} is not a decimal integer",
            amount.quantity
        )));
    }
    Ok(Coin {
        denom: token.denom.clone(),
        amount: amount.quantity.clone(),
    })
}

pub fn coin_to_amount(coin: &Coin, tokens: &[TokenInfo]) -> Result<Amount> {
    let token = tokens
        .iter()
        .find(|t| t.denom == coin.denom)
        .ok_or_else(|| CodecError::UnknownDenom {
            denom: coin.denom.clone(),
        })?;
    if !is_decimal(&coin.amount) {
        return Err(CodecError::Malformed(format!(
            "coin amount {:?} is not a decimal integer",
            coin.amount
        )));
    }
    Ok(Amount::new(
        coin.amount.clone(),
        token.fractional_digits,
        token.ticker.clone(),
    ))
}

pub fn encode_fee(fee: &Fee, tokens: &[TokenInfo]) -> Result<StdFee> {
    let amount = fee
        .tokens
        .iter()
        .map(|a| amount_to_coin(a, tokens))
        .collect::<Result<Vec<_>>>()?;
    Ok(StdFee {
        amount,
        gas: fee.gas_limit.clone(),
    })
}

pub fn decode_fee(fee: &StdFee, tokens: &[TokenInfo]) -> Result<Fee> {
    let amounts = fee
        .amount
        .iter()
        .map(|c| coin_to_amount(c, tokens))
        .collect::<Result<Vec<_>>>()?;
    Ok(Fee {
        tokens: amounts,
        gas_limit: fee.gas.clone(),
    })
}

// ---------------------------------------------------------------------------
// Keys & signatures
// ---------------------------------------------------------------------------

pub fn encode_pubkey(pubkey: &PublicKey) -> StdPubKey {
    let kind = match pubkey.algo {
        KeyAlgorithm::Secp256k1 => PUBKEY_SECP256K1_TYPE,
        KeyAlgorithm::Ed25519 => PUBKEY_ED25519_TYPE,
    };
    StdPubKey {
        kind: kind.to_string(),
        value: STANDARD.encode(&pubkey.data),
    }
}

pub fn decode_pubkey(pubkey: &StdPubKey) -> Result<PublicKey> {
    let algo = match pubkey.kind.as_str() {
        PUBKEY_SECP256K1_TYPE => KeyAlgorithm::Secp256k1,
        PUBKEY_ED25519_TYPE => KeyAlgorithm::Ed25519,
        other => {
            return Err(CodecError::Malformed(format!(
                "unsupported public key type {other}"
            )))
        }
    };
    Ok(PublicKey::new(algo, STANDARD.decode(&pubkey.value)?))
}

pub fn encode_signature(signature: &FullSignature) -> StdSignature {
    StdSignature {
        pub_key: encode_pubkey(&signature.pubkey),
        signature: STANDARD.encode(&signature.signature),
    }
}

pub fn decode_signature(signature: &StdSignature, nonce: Nonce) -> Result<FullSignature> {
    Ok(FullSignature {
        pubkey: decode_pubkey(&signature.pub_key)?,
        signature: STANDARD.decode(&signature.signature)?,
        nonce,
    })
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// The unsigned body: messages, fee and memo, no signatures.
pub fn build_unsigned_tx(
    registry: &MessageRegistry,
    unsigned: &UnsignedTransaction,
    tokens: &[TokenInfo],
) -> Result<StdTx> {
    let msg = unsigned
        .messages
        .iter()
        .map(|m| registry.encode_legacy(m))
        .collect::<Result<Vec<_>>>()?;
    Ok(StdTx {
        msg,
        fee: encode_fee(&unsigned.fee, tokens)?,
        signatures: Vec::new(),
        memo: unsigned.memo.clone(),
    })
}

pub fn build_signed_tx(
    registry: &MessageRegistry,
    signed: &SignedTransaction,
    tokens: &[TokenInfo],
) -> Result<WrappedStdTx> {
    let mut tx = build_unsigned_tx(registry, &signed.transaction, tokens)?;
    tx.signatures = signed.signatures.iter().map(encode_signature).collect();
    Ok(WrappedStdTx {
        kind: STD_TX_TYPE.to_string(),
        value: tx,
    })
}

pub fn marshal_tx(tx: &WrappedStdTx) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(tx)?)
}

/// Parses wire bytes and checks the wrapper type.
pub fn unmarshal_tx(bytes: &[u8]) -> Result<WrappedStdTx> {
    let wrapped: WrappedStdTx = serde_json::from_slice(bytes)?;
    if wrapped.kind != STD_TX_TYPE {
        return Err(CodecError::Malformed(format!(
            "expected wrapper type {STD_TX_TYPE}, got {}",
            wrapped.kind
        )));
    }
    Ok(wrapped)
}

/// Rebuilds a signed transaction. Every signature gets `nonce`.
pub fn parse_tx(
    registry: &MessageRegistry,
    wrapped: &WrappedStdTx,
    chain_id: &str,
    nonce: Nonce,
    tokens: &[TokenInfo],
) -> Result<SignedTransaction> {
    let tx = &wrapped.value;
    let messages = tx
        .msg
        .iter()
        .map(|m| registry.decode_legacy(m))
        .collect::<Result<Vec<_>>>()?;
    let signatures = tx
        .signatures
        .iter()
        .map(|s| decode_signature(s, nonce))
        .collect::<Result<Vec<_>>>()?;

    Ok(SignedTransaction {
        transaction: UnsignedTransaction {
            chain_id: chain_id.to_string(),
            memo: tx.memo.clone(),
            messages,
            fee: decode_fee(&tx.fee, tokens)?,
        },
        signatures,
    })
}
