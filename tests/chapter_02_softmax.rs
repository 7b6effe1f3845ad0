use proptest::prelude::*;
use qkv_attention::nn::activation::{Axis, softmax};
use qkv_attention::tensor::{Tensor, TensorError};

fn matrix(max_dim: usize, magnitude: f64) -> impl Strategy<Value = Tensor<f64, 2>> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(move |(rows, cols)| {
        prop::collection::vec(-magnitude..magnitude, rows * cols)
            .prop_map(move |data| Tensor::new(data, [rows, cols]).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_rows_are_distributions(x in matrix(8, 50.0)) {
        let w = softmax(&x, Axis::Rows).unwrap();
        prop_assert_eq!(w.shape(), x.shape());
        for row in w.iter_rows() {
            let sum: f64 = row.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!(row.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn prop_columns_are_distributions(x in matrix(8, 50.0)) {
        let w = softmax(&x, Axis::Columns).unwrap();
        let [rows, cols] = *w.shape();
        for c in 0..cols {
            let sum: f64 = (0..rows).map(|r| w.get([r, c]).unwrap()).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_large_magnitudes_stay_finite(x in matrix(6, 1e4)) {
        let w = softmax(&x, Axis::Rows).unwrap();
        prop_assert!(w.data().iter().all(|v| v.is_finite()));
        for row in w.iter_rows() {
            let sum: f64 = row.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_shift_invariance(x in matrix(6, 20.0), shift in -1e3..1e3f64) {
        let shifted = x.map(|v| v + shift);
        let a = softmax(&x, Axis::Rows).unwrap();
        let b = softmax(&shifted, Axis::Rows).unwrap();
        for (p, q) in a.data().iter().zip(b.data()) {
            prop_assert!((p - q).abs() < 1e-9);
        }
    }
}

#[test]
fn test_uniform_rows() {
    for n in 1..=10 {
        let x = Tensor::<f64, 2>::new(vec![-7.25; 2 * n], [2, n]).unwrap();
        let w = softmax(&x, Axis::Rows).unwrap();
        for &v in w.data() {
            assert!((v - 1.0 / n as f64).abs() < 1e-12);
        }
    }
}

#[test]
fn test_dominant_entry_is_nearly_one_hot() {
    let x = Tensor::<f64, 2>::from_rows(&[[0.0, 1e4, 1.0, -5.0]]).unwrap();
    let w = softmax(&x, Axis::Rows).unwrap();
    assert!((w.row(0)[1] - 1.0).abs() < 1e-12);
    assert!(w.row(0).iter().all(|v| v.is_finite()));
}

#[test]
fn test_axis_from_index() {
    let x = Tensor::<f64, 2>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let by_index = softmax(&x, Axis::try_from(0).unwrap()).unwrap();
    let by_name = softmax(&x, Axis::Columns).unwrap();
    assert_eq!(by_index, by_name);

    assert!(matches!(Axis::try_from(5), Err(TensorError::InvalidShape(_))));
}

#[test]
fn test_non_matrix_input() {
    let x = Tensor::<f64, 3>::ones([1, 2, 3]);
    assert!(matches!(
        softmax(&x, Axis::Rows),
        Err(TensorError::InvalidShape(_))
    ));
}
