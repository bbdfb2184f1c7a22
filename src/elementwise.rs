//! Element-wise kernels: addition and scaled copy
//!
//! Every operation comes in four variants so they can be timed against each
//! other:
//!
//! | Variant | Loop | Threads |
//! |---|---|---|
//! | [`ElementwiseVariant::Scalar`] | one element per step | 1 |
//! | [`ElementwiseVariant::Vectorized`] | one lane group per step + scalar tail | 1 |
//! | [`ElementwiseVariant::Parallel`] | one element per step | rayon pool |
//! | [`ElementwiseVariant::ParallelVectorized`] | lane groups per chunk + tail | rayon pool |
//!
//! The functions here assume `a`, `b` and `out` have equal lengths (checked
//! with `debug_assert!`); the validated entry point is [`crate::Kernels`].
//! All variants produce bit-identical output.

use rayon::prelude::*;
use serde::Serialize;

use crate::backends::LaneVector;
use crate::partition;

/// Implementation strategy for an element-wise kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementwiseVariant {
    /// Plain scalar loop (reference)
    Scalar,
    /// 4-lane SIMD loop with scalar tail
    Vectorized,
    /// Scalar loop split across the rayon pool
    Parallel,
    /// Lane-aligned chunks across the rayon pool, SIMD inside each chunk
    ParallelVectorized,
}

impl ElementwiseVariant {
    /// All variants, in benchmark order
    pub const ALL: [ElementwiseVariant; 4] = [
        ElementwiseVariant::Vectorized,
        ElementwiseVariant::Scalar,
        ElementwiseVariant::ParallelVectorized,
        ElementwiseVariant::Parallel,
    ];

    /// Short name used in benchmark labels
    pub fn name(self) -> &'static str {
        match self {
            ElementwiseVariant::Scalar => "scalar",
            ElementwiseVariant::Vectorized => "vectorized",
            ElementwiseVariant::Parallel => "parallel",
            ElementwiseVariant::ParallelVectorized => "parallel_vectorized",
        }
    }
}

// ============================================================================
// Generic maps
// ============================================================================

/// `out[i] = sf(a[i], b[i])`, lane groups through `vf`
#[inline(always)]
fn map2_lanes<L, VF, SF>(a: &[f32], b: &[f32], out: &mut [f32], vf: VF, sf: SF)
where
    L: LaneVector<Elem = f32>,
    VF: Fn(L, L) -> L,
    SF: Fn(f32, f32) -> f32,
{
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());

    let split = a.len() - a.len() % L::LANES;
    let (a_body, a_tail) = a.split_at(split);
    let (b_body, b_tail) = b.split_at(split);
    let (out_body, out_tail) = out.split_at_mut(split);

    for ((ca, cb), co) in a_body
        .chunks_exact(L::LANES)
        .zip(b_body.chunks_exact(L::LANES))
        .zip(out_body.chunks_exact_mut(L::LANES))
    {
        // SAFETY: chunks_exact yields exactly L::LANES elements per chunk
        unsafe {
            vf(L::load(ca.as_ptr()), L::load(cb.as_ptr())).store(co.as_mut_ptr());
        }
    }

    for ((o, &x), &y) in out_tail.iter_mut().zip(a_tail).zip(b_tail) {
        *o = sf(x, y);
    }
}

/// `out[i] = sf(a[i])`, lane groups through `vf`
#[inline(always)]
fn map1_lanes<L, VF, SF>(a: &[f32], out: &mut [f32], vf: VF, sf: SF)
where
    L: LaneVector<Elem = f32>,
    VF: Fn(L) -> L,
    SF: Fn(f32) -> f32,
{
    debug_assert_eq!(a.len(), out.len());

    let split = a.len() - a.len() % L::LANES;
    let (a_body, a_tail) = a.split_at(split);
    let (out_body, out_tail) = out.split_at_mut(split);

    for (ca, co) in a_body
        .chunks_exact(L::LANES)
        .zip(out_body.chunks_exact_mut(L::LANES))
    {
        // SAFETY: chunks_exact yields exactly L::LANES elements per chunk
        unsafe {
            vf(L::load(ca.as_ptr())).store(co.as_mut_ptr());
        }
    }

    for (o, &x) in out_tail.iter_mut().zip(a_tail) {
        *o = sf(x);
    }
}

// ============================================================================
// Addition
// ============================================================================

/// Scalar reference: `out[i] = a[i] + b[i]`
pub fn add_scalar(a: &[f32], b: &[f32], out: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x + y;
    }
}

/// Vectorized addition with scalar tail
pub fn add_lanes<L: LaneVector<Elem = f32>>(a: &[f32], b: &[f32], out: &mut [f32]) {
    map2_lanes::<L, _, _>(a, b, out, L::add, |x, y| x + y);
}

/// Scalar addition with the index range split across the rayon pool
pub fn add_parallel(a: &[f32], b: &[f32], out: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    out.par_iter_mut()
        .zip(a.par_iter())
        .zip(b.par_iter())
        .for_each(|((o, &x), &y)| *o = x + y);
}

/// Vectorized addition over lane-aligned chunks, one chunk per worker
pub fn add_parallel_lanes<L: LaneVector<Elem = f32>>(a: &[f32], b: &[f32], out: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let chunk = partition::chunk_len(a.len(), partition::default_parts(), L::LANES);
    out.par_chunks_mut(chunk)
        .zip(a.par_chunks(chunk))
        .zip(b.par_chunks(chunk))
        .for_each(|((co, ca), cb)| add_lanes::<L>(ca, cb, co));
}

/// Run the selected addition variant
pub fn add_with<L: LaneVector<Elem = f32>>(
    variant: ElementwiseVariant,
    a: &[f32],
    b: &[f32],
    out: &mut [f32],
) {
    match variant {
        ElementwiseVariant::Scalar => add_scalar(a, b, out),
        ElementwiseVariant::Vectorized => add_lanes::<L>(a, b, out),
        ElementwiseVariant::Parallel => add_parallel(a, b, out),
        ElementwiseVariant::ParallelVectorized => add_parallel_lanes::<L>(a, b, out),
    }
}

// ============================================================================
// Scaled copy
// ============================================================================

/// Scalar reference: `out[i] = a[i] * factor`
pub fn scale_scalar(a: &[f32], factor: f32, out: &mut [f32]) {
    debug_assert_eq!(a.len(), out.len());
    for (o, &x) in out.iter_mut().zip(a) {
        *o = x * factor;
    }
}

/// Vectorized scaled copy with scalar tail
pub fn scale_lanes<L: LaneVector<Elem = f32>>(a: &[f32], factor: f32, out: &mut [f32]) {
    let vfactor = L::splat(factor);
    map1_lanes::<L, _, _>(a, out, |v| v.mul(vfactor), |x| x * factor);
}

/// Scalar scaled copy split across the rayon pool
pub fn scale_parallel(a: &[f32], factor: f32, out: &mut [f32]) {
    debug_assert_eq!(a.len(), out.len());
    out.par_iter_mut()
        .zip(a.par_iter())
        .for_each(|(o, &x)| *o = x * factor);
}

/// Vectorized scaled copy over lane-aligned chunks, one chunk per worker
pub fn scale_parallel_lanes<L: LaneVector<Elem = f32>>(a: &[f32], factor: f32, out: &mut [f32]) {
    debug_assert_eq!(a.len(), out.len());
    let chunk = partition::chunk_len(a.len(), partition::default_parts(), L::LANES);
    out.par_chunks_mut(chunk)
        .zip(a.par_chunks(chunk))
        .for_each(|(co, ca)| scale_lanes::<L>(ca, factor, co));
}

/// Run the selected scaled-copy variant
pub fn scale_with<L: LaneVector<Elem = f32>>(
    variant: ElementwiseVariant,
    a: &[f32],
    factor: f32,
    out: &mut [f32],
) {
    match variant {
        ElementwiseVariant::Scalar => scale_scalar(a, factor, out),
        ElementwiseVariant::Vectorized => scale_lanes::<L>(a, factor, out),
        ElementwiseVariant::Parallel => scale_parallel(a, factor, out),
        ElementwiseVariant::ParallelVectorized => scale_parallel_lanes::<L>(a, factor, out),
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::backends::NativeF32x4;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_add_matches_per_element_sum(
            pairs in prop::collection::vec((-1000.0f32..1000.0, -1000.0f32..1000.0), 0..300)
        ) {
            let (a, b): (Vec<f32>, Vec<f32>) = pairs.into_iter().unzip();
            for variant in ElementwiseVariant::ALL {
                let mut out = vec![0.0; a.len()];
                add_with::<NativeF32x4>(variant, &a, &b, &mut out);
                for i in 0..a.len() {
                    prop_assert_eq!(out[i].to_bits(), (a[i] + b[i]).to_bits());
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_scale_doubles_every_element(
            a in prop::collection::vec(-1000.0f32..1000.0, 0..300)
        ) {
            for variant in ElementwiseVariant::ALL {
                let mut out = vec![0.0; a.len()];
                scale_with::<NativeF32x4>(variant, &a, 2.0, &mut out);
                for i in 0..a.len() {
                    prop_assert_eq!(out[i], a[i] * 2.0);
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn test_add_is_idempotent_across_runs(
            a in prop::collection::vec(-100.0f32..100.0, 0..200)
        ) {
            let mut first = vec![0.0; a.len()];
            add_parallel_lanes::<NativeF32x4>(&a, &a, &mut first);
            for _ in 0..3 {
                let mut again = vec![0.0; a.len()];
                add_parallel_lanes::<NativeF32x4>(&a, &a, &mut again);
                prop_assert_eq!(&again, &first);
            }
        }
    }
}
