//! Token pooling.
//!
//! Collapses each token's merged subword vectors into a single token
//! vector under the configured strategy.

use tracing::debug;

use longdoc_types::{Alignment, PoolingStrategy, TokenEmbeddings};

/// Pool merged subword vectors into one vector per token.
///
/// A token aligned to no subwords gets a zero vector of `hidden_dim`;
/// such tokens exist legitimately (zero-width or whitespace-only spans),
/// so this is a defined fallback, not an error. The strategy enum is
/// exhaustive; unknown strategy names were already rejected when the
/// configuration was parsed.
pub fn pool_tokens(
    alignment: &Alignment,
    merged: &[Vec<f32>],
    strategy: PoolingStrategy,
    hidden_dim: usize,
) -> TokenEmbeddings {
    let mut vectors = Vec::with_capacity(alignment.token_count());

    for subword_indices in alignment.iter() {
        let vector = match subword_indices {
            [] => vec![0.0; hidden_dim],
            [only] => merged[*only].clone(),
            [first, .., last] => match strategy {
                PoolingStrategy::Average => mean_of(subword_indices, merged, hidden_dim),
                PoolingStrategy::First => merged[*first].clone(),
                PoolingStrategy::Last => merged[*last].clone(),
                PoolingStrategy::FirstLast => pairwise_mean(&merged[*first], &merged[*last]),
                PoolingStrategy::Max => componentwise_max(subword_indices, merged, hidden_dim),
            },
        };
        vectors.push(vector);
    }

    debug!(
        tokens = vectors.len(),
        strategy = %strategy,
        "Pooled token embeddings"
    );

    TokenEmbeddings::new(hidden_dim, vectors)
}

fn mean_of(indices: &[usize], merged: &[Vec<f32>], hidden_dim: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_dim];
    for &index in indices {
        for (acc, value) in sum.iter_mut().zip(&merged[index]) {
            *acc += value;
        }
    }
    let inv = 1.0 / indices.len() as f32;
    for value in sum.iter_mut() {
        *value *= inv;
    }
    sum
}

fn pairwise_mean(first: &[f32], last: &[f32]) -> Vec<f32> {
    first
        .iter()
        .zip(last)
        .map(|(a, b)| (a + b) / 2.0)
        .collect()
}

fn componentwise_max(indices: &[usize], merged: &[Vec<f32>], hidden_dim: usize) -> Vec<f32> {
    let mut max = vec![f32::NEG_INFINITY; hidden_dim];
    for &index in indices {
        for (acc, value) in max.iter_mut().zip(&merged[index]) {
            *acc = acc.max(*value);
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_subword_token() -> (Alignment, Vec<Vec<f32>>) {
        let mut alignment = Alignment::default();
        alignment.push_token(&[0, 1]);
        let merged = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        (alignment, merged)
    }

    #[test]
    fn test_average() {
        let (alignment, merged) = two_subword_token();
        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::Average, 2);
        assert_eq!(pooled.get(0), Some(&[2.0, 3.0][..]));
    }

    #[test]
    fn test_first() {
        let (alignment, merged) = two_subword_token();
        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::First, 2);
        assert_eq!(pooled.get(0), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_last() {
        let (alignment, merged) = two_subword_token();
        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::Last, 2);
        assert_eq!(pooled.get(0), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_first_last() {
        let (alignment, merged) = two_subword_token();
        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::FirstLast, 2);
        assert_eq!(pooled.get(0), Some(&[2.0, 3.0][..]));
    }

    #[test]
    fn test_max() {
        let (alignment, merged) = two_subword_token();
        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::Max, 2);
        assert_eq!(pooled.get(0), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_max_mixed_signs() {
        let mut alignment = Alignment::default();
        alignment.push_token(&[0, 1]);
        let merged = vec![vec![-1.0, 5.0], vec![2.0, -3.0]];
        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::Max, 2);
        assert_eq!(pooled.get(0), Some(&[2.0, 5.0][..]));
    }

    #[test]
    fn test_single_subword_same_under_all_strategies() {
        for strategy in [
            PoolingStrategy::Average,
            PoolingStrategy::First,
            PoolingStrategy::Last,
            PoolingStrategy::FirstLast,
            PoolingStrategy::Max,
        ] {
            let mut alignment = Alignment::default();
            alignment.push_token(&[0]);
            let merged = vec![vec![7.0, -2.0]];
            let pooled = pool_tokens(&alignment, &merged, strategy, 2);
            assert_eq!(pooled.get(0), Some(&[7.0, -2.0][..]), "{}", strategy);
        }
    }

    #[test]
    fn test_empty_token_zero_vector_under_all_strategies() {
        for strategy in [
            PoolingStrategy::Average,
            PoolingStrategy::First,
            PoolingStrategy::Last,
            PoolingStrategy::FirstLast,
            PoolingStrategy::Max,
        ] {
            let mut alignment = Alignment::default();
            alignment.push_token(&[]);
            let pooled = pool_tokens(&alignment, &[], strategy, 3);
            assert_eq!(pooled.get(0), Some(&[0.0, 0.0, 0.0][..]), "{}", strategy);
        }
    }

    #[test]
    fn test_multiple_tokens() {
        let mut alignment = Alignment::default();
        alignment.push_token(&[0]);
        alignment.push_token(&[1, 2]);
        alignment.push_token(&[]);
        let merged = vec![vec![1.0], vec![2.0], vec![4.0]];

        let pooled = pool_tokens(&alignment, &merged, PoolingStrategy::Average, 1);
        assert_eq!(pooled.len(), 3);
        assert_eq!(pooled.get(0), Some(&[1.0][..]));
        assert_eq!(pooled.get(1), Some(&[3.0][..]));
        assert_eq!(pooled.get(2), Some(&[0.0][..]));
    }
}
