/// Cosine similarity in [-1, 1], accumulated in f64.
///
/// Callers check dimensions first; extra elements of the longer slice are
/// ignored here. A zero-norm vector scores 0.0 instead of dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "non-finite cosine similarity; scoring as zero"
        );
        return 0.0;
    }

    // rounding can push identical vectors a hair past 1.0
    score.clamp(-1.0, 1.0)
}
