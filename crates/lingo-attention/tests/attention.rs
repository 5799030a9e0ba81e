//! End-to-end attention scenarios mirroring the demo driver.

use lingo_attention::mask::padding_mask;
use lingo_attention::{scaled_dot_product_attention, Mask};
use lingo_core::{LingoError, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

const BATCH: usize = 2;
const SEQ_Q: usize = 3;
const SEQ_K: usize = 4;
const D_K: usize = 8;
const D_V: usize = 8;

fn random_qkv(seed: u64) -> (Tensor, Tensor, Tensor) {
    let mut rng = StdRng::seed_from_u64(seed);
    let q = Tensor::rand_uniform(&[BATCH, SEQ_Q, D_K], 0.0, 1.0, &mut rng);
    let k = Tensor::rand_uniform(&[BATCH, SEQ_K, D_K], 0.0, 1.0, &mut rng);
    let v = Tensor::rand_uniform(&[BATCH, SEQ_K, D_V], 0.0, 1.0, &mut rng);
    (q, k, v)
}

#[test]
fn test_demo_shapes_and_row_sums() {
    let (q, k, v) = random_qkv(42);
    let attn = scaled_dot_product_attention(&q, &k, &v, None).unwrap();

    assert_eq!(attn.output.shape().dims(), &[BATCH, SEQ_Q, D_V]);
    assert_eq!(attn.weights.shape().dims(), &[BATCH, SEQ_Q, SEQ_K]);
    for sum in attn.weights.sum_last_axis().unwrap().as_f32_slice() {
        assert!((sum - 1.0).abs() < 1e-6);
    }
}

#[test]
fn test_demo_mask_last_key() {
    let (q, k, v) = random_qkv(42);

    // Numeric mask of ones with the last key zeroed for every query
    let mut keep = Tensor::ones(&[BATCH, SEQ_Q, SEQ_K]);
    for row in keep.as_f32_slice_mut().chunks_mut(SEQ_K) {
        row[SEQ_K - 1] = 0.0;
    }
    let mask = Mask::numeric(keep);

    let attn = scaled_dot_product_attention(&q, &k, &v, Some(&mask)).unwrap();
    for row in attn.weights.rows() {
        assert!(row[SEQ_K - 1] < 1e-6);
        let sum: f32 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    // Same result from the equivalent boolean mask broadcast over the batch
    let flags: Vec<bool> = (0..SEQ_Q * SEQ_K).map(|i| i % SEQ_K != SEQ_K - 1).collect();
    let bool_mask = Mask::from_bool(&flags, &[SEQ_Q, SEQ_K]).unwrap();
    let again = scaled_dot_product_attention(&q, &k, &v, Some(&bool_mask)).unwrap();
    assert_eq!(attn, again);
}

#[test]
fn test_padding_mask_per_batch() {
    let (q, k, v) = random_qkv(7);
    let mask = padding_mask(&[2, 4], SEQ_K);

    let attn = scaled_dot_product_attention(&q, &k, &v, Some(&mask)).unwrap();
    let w = &attn.weights;
    for i in 0..SEQ_Q {
        // Batch 0 sees only the first two keys
        assert!(w.get(&[0, i, 2]).unwrap() < 1e-6);
        assert!(w.get(&[0, i, 3]).unwrap() < 1e-6);
        // Batch 1 sees all keys
        assert!(w.get(&[1, i, 3]).unwrap() > 0.0);
    }
}

#[test]
fn test_shared_keys_broadcast_over_query_batch() {
    let (q, k, v) = random_qkv(3);

    // Unbatched K/V broadcast against batched Q
    let k0 = Tensor::from_f32(&k.as_f32_slice()[..SEQ_K * D_K], &[SEQ_K, D_K]);
    let v0 = Tensor::from_f32(&v.as_f32_slice()[..SEQ_K * D_V], &[SEQ_K, D_V]);
    let attn = scaled_dot_product_attention(&q, &k0, &v0, None).unwrap();
    assert_eq!(attn.output.shape().dims(), &[BATCH, SEQ_Q, D_V]);

    // The first batch entry matches attending with explicit batch-1 inputs
    let q0 = Tensor::from_f32(&q.as_f32_slice()[..SEQ_Q * D_K], &[SEQ_Q, D_K]);
    let single = scaled_dot_product_attention(&q0, &k0, &v0, None).unwrap();
    assert_eq!(&attn.output.as_f32_slice()[..SEQ_Q * D_V], single.output.as_f32_slice());
}

#[test]
fn test_mask_shape_mismatch_surfaces() {
    let (q, k, v) = random_qkv(1);
    let mask = Mask::from_bool(&[true; SEQ_Q * 5], &[SEQ_Q, 5]).unwrap();
    let err = scaled_dot_product_attention(&q, &k, &v, Some(&mask)).unwrap_err();
    assert!(err.is_shape_error());
}

#[test]
fn test_key_value_batch_mismatch_surfaces() {
    let mut rng = StdRng::seed_from_u64(5);
    let q = Tensor::rand_uniform(&[2, 3, 4], 0.0, 1.0, &mut rng);
    let k = Tensor::rand_uniform(&[2, 5, 4], 0.0, 1.0, &mut rng);
    let v = Tensor::rand_uniform(&[3, 5, 4], 0.0, 1.0, &mut rng);
    let err = scaled_dot_product_attention(&q, &k, &v, None).unwrap_err();
    assert!(matches!(err, LingoError::ShapeMismatch { .. }), "{err}");
}

#[test]
fn test_value_sequence_mismatch_surfaces() {
    let mut rng = StdRng::seed_from_u64(6);
    let q = Tensor::rand_uniform(&[2, 3, 4], 0.0, 1.0, &mut rng);
    let k = Tensor::rand_uniform(&[2, 5, 4], 0.0, 1.0, &mut rng);
    let v = Tensor::rand_uniform(&[2, 6, 4], 0.0, 1.0, &mut rng);
    let err = scaled_dot_product_attention(&q, &k, &v, None).unwrap_err();
    assert!(matches!(err, LingoError::ShapeMismatch { .. }), "{err}");
}

#[test]
fn test_single_key_batch_broadcasts_over_values() {
    let mut rng = StdRng::seed_from_u64(8);
    let q = Tensor::rand_uniform(&[1, 3, 4], 0.0, 1.0, &mut rng);
    let k = Tensor::rand_uniform(&[1, 5, 4], 0.0, 1.0, &mut rng);
    let v = Tensor::rand_uniform(&[3, 5, 2], 0.0, 1.0, &mut rng);

    let attn = scaled_dot_product_attention(&q, &k, &v, None).unwrap();
    assert_eq!(attn.weights.shape().dims(), &[1, 3, 5]);
    assert_eq!(attn.output.shape().dims(), &[3, 3, 2]);

    // Every value batch is mixed with the same shared weights
    for b in 0..3 {
        let vb = Tensor::from_f32(&v.as_f32_slice()[b * 10..(b + 1) * 10], &[5, 2]);
        let expected = attn.weights.matmul(&vb).unwrap();
        assert_eq!(&attn.output.as_f32_slice()[b * 6..(b + 1) * 6], expected.as_f32_slice());
    }
}
