/// Format an `f32` as a WGSL float literal. Non-finite values become `0.0`.
pub fn fmt_f32(v: f32) -> String {
    if v.is_finite() {
        // Debug output always carries a fractional part or an exponent.
        format!("{v:?}")
    } else {
        "0.0".to_string()
    }
}

/// Number of workgroups needed to cover `count` invocations along one axis.
pub fn workgroup_count(count: u32, workgroup_size: u32) -> u32 {
    count.div_ceil(workgroup_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_f32_keeps_float_literal_form() {
        assert_eq!(fmt_f32(1.0), "1.0");
        assert_eq!(fmt_f32(-0.25), "-0.25");
        assert_eq!(fmt_f32(f32::NAN), "0.0");
        assert_eq!(fmt_f32(f32::INFINITY), "0.0");
        assert!(fmt_f32(1.0e-7).contains('e'));
    }

    #[test]
    fn workgroup_count_rounds_up() {
        assert_eq!(workgroup_count(2, 16), 1);
        assert_eq!(workgroup_count(16, 16), 1);
        assert_eq!(workgroup_count(17, 16), 2);
        assert_eq!(workgroup_count(1025, 16), 65);
    }
}
