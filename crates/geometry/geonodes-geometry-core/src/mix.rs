//! Averaging of attribute values when several source elements map onto one target element.

use geonodes_api_core::DataType;

use crate::garray::GArray;

/// Accumulates source elements into destination slots and produces the mixed array.
///
/// Numeric types average their contributions (`Int32` rounds the average), `Bool` is `true`
/// when any contribution is `true`. Slots that receive nothing keep the type's default.
pub(crate) struct AttributeMixer<'a> {
    src: &'a GArray,
    sums: Vec<[f32; 4]>,
    counts: Vec<u32>,
}

impl<'a> AttributeMixer<'a> {
    pub(crate) fn new(src: &'a GArray, dst_len: usize) -> Self {
        AttributeMixer {
            src,
            sums: vec![[0.0; 4]; dst_len],
            counts: vec![0; dst_len],
        }
    }

    /// Add source element `src_index` to destination slot `dst_index`.
    pub(crate) fn mix_in(&mut self, dst_index: usize, src_index: usize) {
        let value = components(self.src, src_index);
        let sum = &mut self.sums[dst_index];
        for (acc, c) in sum.iter_mut().zip(value) {
            *acc += c;
        }
        self.counts[dst_index] += 1;
    }

    pub(crate) fn finalize(self) -> GArray {
        let AttributeMixer { src, sums, counts } = self;
        let avg = |i: usize| -> [f32; 4] {
            let n = counts[i];
            if n == 0 {
                return [0.0; 4];
            }
            let s = sums[i];
            let n = n as f32;
            [s[0] / n, s[1] / n, s[2] / n, s[3] / n]
        };
        let len = counts.len();
        match src.data_type() {
            // `sums[i][0]` counts the true contributions.
            DataType::Bool => GArray::Bool((0..len).map(|i| sums[i][0] > 0.0).collect()),
            DataType::Int32 => GArray::Int32((0..len).map(|i| avg(i)[0].round() as i32).collect()),
            DataType::Float => GArray::Float((0..len).map(|i| avg(i)[0]).collect()),
            DataType::Float2 => GArray::Float2(
                (0..len)
                    .map(|i| {
                        let a = avg(i);
                        [a[0], a[1]]
                    })
                    .collect(),
            ),
            DataType::Float3 => GArray::Float3(
                (0..len)
                    .map(|i| {
                        let a = avg(i);
                        [a[0], a[1], a[2]]
                    })
                    .collect(),
            ),
            DataType::Color => GArray::Color((0..len).map(avg).collect()),
        }
    }
}

fn components(arr: &GArray, i: usize) -> [f32; 4] {
    match arr {
        GArray::Bool(v) => [if v[i] { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        GArray::Int32(v) => [v[i] as f32, 0.0, 0.0, 0.0],
        GArray::Float(v) => [v[i], 0.0, 0.0, 0.0],
        GArray::Float2(v) => [v[i][0], v[i][1], 0.0, 0.0],
        GArray::Float3(v) => [v[i][0], v[i][1], v[i][2], 0.0],
        GArray::Color(v) => v[i],
    }
}

/// Mix `src` into `dst_len` slots following `(dst, src)` index pairs.
pub(crate) fn mix_pairs(
    src: &GArray,
    dst_len: usize,
    pairs: impl IntoIterator<Item = (usize, usize)>,
) -> GArray {
    let mut mixer = AttributeMixer::new(src, dst_len);
    for (dst, s) in pairs {
        mixer.mix_in(dst, s);
    }
    mixer.finalize()
}
