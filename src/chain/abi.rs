// Minimal ABI codec for the three WhackAMole contract functions.

use super::Address;
use crate::error::GameError;
use crate::state::leaderboard::ScoreRecord;

const WORD: usize = 32;

/// keccak256("submitScore(uint256)")[..4]
pub const SUBMIT_SCORE: [u8; 4] = [0xaf, 0xf0, 0xb2, 0x97];
/// keccak256("getHighScore(address)")[..4]
pub const GET_HIGH_SCORE: [u8; 4] = [0x57, 0x17, 0x1a, 0x48];
/// keccak256("getTopScores()")[..4]
pub const GET_TOP_SCORES: [u8; 4] = [0xee, 0x5c, 0x4e, 0x5d];

fn malformed(what: &str) -> GameError {
    GameError::GatewayUnavailable(format!("malformed contract response: {}", what))
}

fn uint_word(v: u64) -> [u8; WORD] {
    let mut w = [0u8; WORD];
    w[WORD - 8..].copy_from_slice(&v.to_be_bytes());
    w
}

fn address_word(addr: &Address) -> [u8; WORD] {
    let mut w = [0u8; WORD];
    // Address is validated on construction, so decoding cannot fail.
    if let Ok(bytes) = hex::decode(&addr.as_str()[2..]) {
        w[WORD - 20..].copy_from_slice(&bytes);
    }
    w
}

fn calldata(selector: [u8; 4], words: &[[u8; WORD]]) -> String {
    let mut out = Vec::with_capacity(4 + words.len() * WORD);
    out.extend_from_slice(&selector);
    for w in words {
        out.extend_from_slice(w);
    }
    format!("0x{}", hex::encode(out))
}

pub fn encode_submit_score(score: u64) -> String {
    calldata(SUBMIT_SCORE, &[uint_word(score)])
}

pub fn encode_get_high_score(player: &Address) -> String {
    calldata(GET_HIGH_SCORE, &[address_word(player)])
}

pub fn encode_get_top_scores() -> String {
    calldata(GET_TOP_SCORES, &[])
}

fn decode_hex(raw: &str) -> Result<Vec<u8>, GameError> {
    let body = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(body).map_err(|_| malformed("not hex"))
}

fn word_at(data: &[u8], index: usize) -> Result<&[u8], GameError> {
    let start = index.checked_mul(WORD).ok_or_else(|| malformed("offset overflow"))?;
    let end = start.checked_add(WORD).ok_or_else(|| malformed("offset overflow"))?;
    data.get(start..end).ok_or_else(|| malformed("truncated"))
}

/// Big-endian uint256 word that must fit in a u64.
fn word_u64(word: &[u8]) -> Result<u64, GameError> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(malformed("integer exceeds 64 bits"));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(buf))
}

fn word_usize(word: &[u8]) -> Result<usize, GameError> {
    usize::try_from(word_u64(word)?).map_err(|_| malformed("offset exceeds address space"))
}

fn word_address(word: &[u8]) -> Result<Address, GameError> {
    if word[..WORD - 20].iter().any(|b| *b != 0) {
        return Err(malformed("dirty address padding"));
    }
    let mut buf = [0u8; 20];
    buf.copy_from_slice(&word[WORD - 20..]);
    Ok(Address::from_bytes(&buf))
}

pub fn decode_uint(raw: &str) -> Result<u64, GameError> {
    let data = decode_hex(raw)?;
    word_u64(word_at(&data, 0)?)
}

/// Decode `(address player, uint256 score)[]`: head offset, length, then two words per record.
pub fn decode_score_records(raw: &str) -> Result<Vec<ScoreRecord>, GameError> {
    let data = decode_hex(raw)?;
    if data.is_empty() {
        return Err(malformed("empty return data"));
    }
    let offset = word_usize(word_at(&data, 0)?)?;
    if offset % WORD != 0 {
        return Err(malformed("unaligned array offset"));
    }
    let base = offset / WORD;
    let len = word_usize(word_at(&data, base)?)?;
    // word_at(base) succeeded, so base + 1 <= data.len() / WORD
    let remaining = data.len() / WORD - (base + 1);
    if len > remaining / 2 {
        return Err(malformed("truncated array"));
    }
    let mut records = Vec::with_capacity(len);
    for i in 0..len {
        let head = base + 1 + i * 2;
        records.push(ScoreRecord {
            player: word_address(word_at(&data, head)?)?,
            score: word_u64(word_at(&data, head + 1)?)?,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hex(v: u64) -> String {
        format!("{:064x}", v)
    }

    fn addr_hex(byte: u8) -> String {
        format!("{:0>64}", hex::encode([byte; 20]))
    }

    #[test]
    fn submit_score_calldata() {
        assert_eq!(
            encode_submit_score(7),
            format!("0xaff0b297{}", word_hex(7))
        );
    }

    #[test]
    fn high_score_calldata_pads_address() {
        let player = Address::from_bytes(&[0xab; 20]);
        let data = encode_get_high_score(&player);
        assert_eq!(data, format!("0x57171a48{}", addr_hex(0xab)));
        assert_eq!(encode_get_top_scores(), "0xee5c4e5d");
    }

    #[test]
    fn decode_uint_rejects_oversized() {
        assert_eq!(decode_uint(&format!("0x{}", word_hex(42))), Ok(42));
        let big = format!("0x01{}", "0".repeat(62));
        assert!(decode_uint(&big).is_err());
        assert!(decode_uint("0x").is_err());
    }

    #[test]
    fn decode_top_scores_array() {
        let raw = format!(
            "0x{}{}{}{}{}{}",
            word_hex(0x20),
            word_hex(2),
            addr_hex(0x0a),
            word_hex(10),
            addr_hex(0x0b),
            word_hex(30)
        );
        let records = decode_score_records(&raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].player, Address::from_bytes(&[0x0a; 20]));
        assert_eq!(records[0].score, 10);
        assert_eq!(records[1].score, 30);
    }

    #[test]
    fn decode_top_scores_empty_and_truncated() {
        let empty = format!("0x{}{}", word_hex(0x20), word_hex(0));
        assert_eq!(decode_score_records(&empty), Ok(vec![]));
        let truncated = format!("0x{}{}{}", word_hex(0x20), word_hex(1), addr_hex(0x0a));
        assert!(decode_score_records(&truncated).is_err());
        assert!(decode_score_records("0x").is_err());
    }

    #[test]
    fn decode_top_scores_rejects_huge_offset_and_length() {
        let huge_offset = format!("0x{}{}", word_hex(u64::MAX - 31), word_hex(0));
        assert!(matches!(
            decode_score_records(&huge_offset),
            Err(GameError::GatewayUnavailable(_))
        ));
        let huge_len = format!("0x{}{}{}{}", word_hex(0x20), word_hex(1 << 62), addr_hex(0x0a), word_hex(1));
        assert!(matches!(
            decode_score_records(&huge_len),
            Err(GameError::GatewayUnavailable(_))
        ));
        let max_len = format!("0x{}{}", word_hex(0x20), word_hex(u64::MAX));
        assert!(decode_score_records(&max_len).is_err());
    }
}
