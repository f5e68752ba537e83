use proptest::prelude::*;
use rayon::{ThreadPoolBuilder, prelude::*};
use vcf_geno::{
    Depth, FieldValues, GenotypeField, GenotypeSerializer, GenotypeTable, SerializeOptions,
    render,
};

const NAMES: [&str; 4] = ["GT", "AD", "GQ", "PL"];

/// Random table with up to four fields of mixed kinds and depths.
fn arb_table() -> impl Strategy<Value = GenotypeTable> {
    (1usize..6, 0usize..4, 1usize..=4).prop_flat_map(|(rows, samples, n_fields)| {
        let fields = (0..n_fields)
            .map(|k| arb_field(k, rows, samples))
            .collect::<Vec<_>>();
        fields.prop_map(move |fields| GenotypeTable {
            samples: (0..samples).map(|j| format!("S{j}")).collect(),
            fixed: (0..rows).map(|i| format!("1\t{}", i + 1)).collect(),
            fields,
        })
    })
}

fn arb_field(k: usize, rows: usize, samples: usize) -> impl Strategy<Value = GenotypeField> {
    let depth = prop_oneof![Just(Depth::Scalar), (1usize..4).prop_map(Depth::Fixed)];
    depth.prop_flat_map(move |depth| {
        let cells = rows * samples * depth.z_max();
        let values = prop_oneof![
            proptest::collection::vec(proptest::option::weighted(0.3, 0i32..100), cells)
                .prop_map(FieldValues::Integer),
            proptest::collection::vec(proptest::option::weighted(0.3, -10.0f64..10.0), cells)
                .prop_map(FieldValues::Float),
            proptest::collection::vec(proptest::option::weighted(0.3, "[0-2][/|][0-2]"), cells)
                .prop_map(FieldValues::Text),
            proptest::collection::vec(
                proptest::collection::vec(proptest::option::weighted(0.3, 0i32..9), 0..3)
                    .prop_map(FieldValues::Integer),
                cells
            )
            .prop_map(FieldValues::List),
        ];
        values.prop_map(move |values| GenotypeField::new(NAMES[k], depth, values))
    })
}

fn cell_present(values: &FieldValues, index: usize) -> bool {
    match values {
        FieldValues::Absent => false,
        FieldValues::Logical(v) => v[index].is_some(),
        FieldValues::Integer(v) => v[index].is_some(),
        FieldValues::Float(v) => v[index].is_some(),
        FieldValues::Text(v) => v[index].is_some(),
        FieldValues::List(cells) => match &cells[index] {
            FieldValues::Integer(v) => v.iter().any(Option::is_some),
            _ => false,
        },
    }
}

proptest! {
    #[test]
    fn format_lists_exactly_the_fields_with_values(table in arb_table()) {
        let dims = table.dims();
        let serialized = GenotypeSerializer::default().serialize(&table).unwrap();

        for (i, line) in serialized.lines.iter().enumerate() {
            let format = line.split('\t').nth(2).unwrap();
            let listed: Vec<&str> = if format.is_empty() {
                Vec::new()
            } else {
                format.split(':').collect()
            };

            let expected: Vec<&str> = table
                .fields
                .iter()
                .filter(|field| {
                    (0..dims.samples).any(|j| {
                        (0..field.depth.z_max())
                            .any(|z| cell_present(&field.values, dims.index(i, j, z)))
                    })
                })
                .map(|field| field.name.as_str())
                .collect();
            prop_assert_eq!(listed, expected);
        }
    }

    #[test]
    fn separators_never_dangle(table in arb_table()) {
        let serialized = GenotypeSerializer::default().serialize(&table).unwrap();

        for line in &serialized.lines {
            let columns: Vec<&str> = line.split('\t').collect();
            // fixed (2 columns) + FORMAT + one block per sample; the FORMAT
            // tab is kept even without samples
            prop_assert_eq!(columns.len(), 3 + table.samples.len().max(1));

            let format = columns[2];
            prop_assert!(!format.starts_with(':') && !format.ends_with(':'));
            prop_assert!(!format.contains("::"));

            let active = if format.is_empty() { 0 } else { format.split(':').count() };
            for block in &columns[3..] {
                if active == 0 {
                    prop_assert_eq!(*block, "");
                } else {
                    // every active field leaves exactly one slot
                    prop_assert_eq!(block.split(':').count(), active);
                }
            }
        }
    }

    #[test]
    fn integers_round_trip(v in any::<i32>()) {
        let mut out = String::new();
        render::render_integer(Some(v), &mut out);
        prop_assert_eq!(out.parse::<i32>().unwrap(), v);
    }

    #[test]
    fn floats_round_trip_to_six_significant_digits(v in -1e12f64..1e12) {
        let mut out = String::new();
        render::format_general(v, &mut out);
        let parsed: f64 = out.parse().unwrap();
        let tolerance = v.abs() * 5e-6 + f64::MIN_POSITIVE;
        prop_assert!((parsed - v).abs() <= tolerance, "{} rendered as {}", v, out);
        // six significant digits at most
        let digits = out
            .split('e')
            .next()
            .unwrap()
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>();
        prop_assert!(digits.trim_start_matches('0').len() <= 6, "{}", out);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn thread_count_does_not_change_output(table in arb_table()) {
        let sequential = GenotypeSerializer::default().serialize(&table).unwrap();
        let parallel = GenotypeSerializer::new(SerializeOptions {
            parallel: true,
            ..SerializeOptions::default()
        });

        let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let results = pool.install(|| {
            (0..4)
                .into_par_iter()
                .map(|_| parallel.serialize(&table).unwrap())
                .collect::<Vec<_>>()
        });

        for result in results {
            prop_assert_eq!(&result, &sequential);
        }
    }
}
