//! Token-subword alignment.
//!
//! Reconciles two independent segmentations of the same text: linguistic
//! tokens from the upstream source and subwords from the model tokenizer,
//! both given as half-open byte ranges.

use tracing::debug;

use longdoc_types::{Alignment, Subword, Token};

/// Map each token to the ordered subword indices whose byte range
/// intersects the token's byte range.
///
/// Per token: binary search over subword end offsets finds the first
/// subword that reaches past the token start, then a forward scan collects
/// candidates until subword starts pass the token end. Candidates whose
/// range only touches the token at a boundary are dropped (ranges are
/// half-open). Runs in `O((T + S) log S)` plus the scanned overlap.
///
/// A token intersecting no subwords gets an empty set; a subword straddling
/// several tokens is assigned to every token it intersects.
pub fn align_tokens(tokens: &[Token], subwords: &[Subword]) -> Alignment {
    let end_offsets: Vec<usize> = subwords.iter().map(|s| s.byte_end).collect();

    let mut alignment = Alignment::with_capacity(tokens.len());
    let mut scratch: Vec<usize> = Vec::new();

    for token in tokens {
        scratch.clear();

        // First subword whose end offset reaches past the token start.
        // Subwords ending exactly at the token start do not intersect it.
        let first = end_offsets.partition_point(|&end| end <= token.byte_start);

        let mut idx = first;
        while idx < subwords.len() && subwords[idx].byte_start < token.byte_end {
            if subwords[idx].intersects(token) {
                scratch.push(idx);
            }
            idx += 1;
        }

        alignment.push_token(&scratch);
    }

    debug!(
        tokens = tokens.len(),
        subwords = subwords.len(),
        pairs = alignment.pair_count(),
        "Aligned tokens to subwords"
    );

    alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subwords_from_offsets(offsets: &[(usize, usize)]) -> Vec<Subword> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| Subword::new(i as u32 + 1, start, end))
            .collect()
    }

    #[test]
    fn test_one_token_many_subwords() {
        // "anticonstitutionnellement" split into three pieces
        let subwords = subwords_from_offsets(&[(0, 4), (4, 12), (12, 25)]);
        let tokens = vec![Token::new(0, 25)];

        let alignment = align_tokens(&tokens, &subwords);
        assert_eq!(alignment.subwords_for(0), &[0, 1, 2]);
    }

    #[test]
    fn test_aligned_segmentations() {
        let subwords = subwords_from_offsets(&[(0, 2), (3, 7), (8, 12)]);
        let tokens = vec![Token::new(0, 2), Token::new(3, 7), Token::new(8, 12)];

        let alignment = align_tokens(&tokens, &subwords);
        assert_eq!(alignment.subwords_for(0), &[0]);
        assert_eq!(alignment.subwords_for(1), &[1]);
        assert_eq!(alignment.subwords_for(2), &[2]);
    }

    #[test]
    fn test_token_with_no_subwords() {
        // Whitespace-only token span falls between subwords
        let subwords = subwords_from_offsets(&[(0, 2), (5, 8)]);
        let tokens = vec![Token::new(0, 2), Token::new(3, 4), Token::new(5, 8)];

        let alignment = align_tokens(&tokens, &subwords);
        assert_eq!(alignment.subwords_for(1), &[] as &[usize]);
    }

    #[test]
    fn test_boundary_touch_is_not_intersection() {
        // Subword ends exactly where the token starts
        let subwords = subwords_from_offsets(&[(0, 5), (5, 9)]);
        let tokens = vec![Token::new(5, 9)];

        let alignment = align_tokens(&tokens, &subwords);
        assert_eq!(alignment.subwords_for(0), &[1]);
    }

    #[test]
    fn test_subword_spanning_two_tokens() {
        // Tokenizer artifact: one subword covering "l'eau" against tokens
        // "l'" and "eau"
        let subwords = subwords_from_offsets(&[(0, 5)]);
        let tokens = vec![Token::new(0, 2), Token::new(2, 5)];

        let alignment = align_tokens(&tokens, &subwords);
        assert_eq!(alignment.subwords_for(0), &[0]);
        assert_eq!(alignment.subwords_for(1), &[0]);
    }

    #[test]
    fn test_subword_straddling_token_start() {
        let subwords = subwords_from_offsets(&[(0, 6), (6, 10)]);
        let tokens = vec![Token::new(4, 10)];

        let alignment = align_tokens(&tokens, &subwords);
        assert_eq!(alignment.subwords_for(0), &[0, 1]);
    }

    #[test]
    fn test_empty_inputs() {
        let alignment = align_tokens(&[], &[]);
        assert_eq!(alignment.token_count(), 0);

        let tokens = vec![Token::new(0, 3)];
        let alignment = align_tokens(&tokens, &[]);
        assert_eq!(alignment.token_count(), 1);
        assert_eq!(alignment.subwords_for(0), &[] as &[usize]);
    }
}
