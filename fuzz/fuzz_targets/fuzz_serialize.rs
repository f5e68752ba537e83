#![no_main]

use libfuzzer_sys::fuzz_target;
use vcf_geno::{GenotypeSerializer, GenotypeTable};

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON; most inputs fail to parse, which is fine.
    let Ok(table) = GenotypeTable::from_reader(data) else {
        return;
    };

    // Shape errors are reported, never panics.
    let Ok(serialized) = GenotypeSerializer::default().serialize(&table) else {
        return;
    };

    assert_eq!(serialized.lines.len(), table.fixed.len());
    for (line, fixed) in serialized.lines.iter().zip(&table.fixed) {
        assert!(line.starts_with(fixed.as_str()), "line lost its fixed prefix");
    }
});
