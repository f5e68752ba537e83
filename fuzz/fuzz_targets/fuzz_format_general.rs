#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|bits: u64| {
    let v = f64::from_bits(bits);
    let mut out = String::new();
    vcf_geno::render::format_general(v, &mut out);

    // Invariants: bounded length, finite values parse back
    assert!(out.len() <= 16, "unexpected rendering {out}");
    if v.is_finite() {
        let parsed: f64 = out.parse().expect("finite values re-parse");
        assert!(parsed.is_finite());
    }
});
