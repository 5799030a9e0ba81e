//! Integration tests composing lingo-core ops the way attention uses them.

use lingo_core::{LingoError, Tensor};

fn assert_close(a: &[f32], b: &[f32], tol: f32) {
    assert_eq!(a.len(), b.len(), "length mismatch: {} vs {}", a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (x - y).abs() < tol,
            "element {} differs: {} vs {} (tol={})",
            i, x, y, tol
        );
    }
}

#[test]
fn test_gram_matrix_via_transpose() {
    // X @ X^T is symmetric with squared norms on the diagonal
    let x = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]);
    let gram = x.matmul(&x.transpose().unwrap()).unwrap();
    assert_eq!(gram.shape().dims(), &[3, 3]);
    assert_eq!(gram.get(&[0, 0]), Some(5.0));
    assert_eq!(gram.get(&[1, 1]), Some(25.0));
    assert_eq!(gram.get(&[0, 2]), gram.get(&[2, 0]));
}

#[test]
fn test_softmax_then_matmul_averages_rows() {
    let scores = Tensor::zeros(&[2, 2, 3]);
    let weights = scores.softmax_last_axis().unwrap();
    let values = Tensor::from_f32(&[3.0, 0.0, 6.0, 3.0, 0.0, 6.0], &[3, 2]);
    let out = weights.matmul(&values).unwrap();
    assert_eq!(out.shape().dims(), &[2, 2, 2]);
    assert_close(out.as_f32_slice(), &[3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0], 1e-5);
}

#[test]
fn test_incompatible_batches_surface_shape_mismatch() {
    let a = Tensor::ones(&[2, 3, 4]);
    let b = Tensor::ones(&[5, 4, 3]);
    match a.matmul(&b) {
        Err(LingoError::ShapeMismatch { expected, got }) => {
            assert_eq!(expected, vec![2]);
            assert_eq!(got, vec![5]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}
