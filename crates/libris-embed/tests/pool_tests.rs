use candle_core::{DType, Device, Tensor};
use libris_embed::masked_mean_l2;

#[test]
fn masked_mean_l2_ignores_padding_per_row() {
    let dev = Device::Cpu;
    // Two rows, two tokens, hidden dim 2. Row 0 masks its second token.
    let h = Tensor::from_slice(
        &[3.0f32, 4.0, 100.0, 100.0, // row 0
          1.0, 0.0, 1.0, 2.0],       // row 1
        (2, 2, 2),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1u32, 0, 1, 1], (2, 2), &dev).unwrap().to_dtype(DType::F32).unwrap();
    let out: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();

    // Row 0: [3,4] normalized. Row 1: mean [1,1] normalized.
    let expected = [[0.6f32, 0.8], [std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2]];
    for (row, want) in out.iter().zip(expected) {
        for (a, b) in row.iter().zip(want) {
            assert!((a - b).abs() < 1e-5, "a={a} b={b}");
        }
    }
}
