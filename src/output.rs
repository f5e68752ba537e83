use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use noodles::vcf::{
    self as vcf,
    header::{
        FileFormat,
        record::{
            key,
            value::{
                Collection, Map,
                map::{
                    Format,
                    format::{Number, Type},
                },
            },
        },
    },
    variant::record::samples::keys::key as format_key,
};

use crate::field::{Depth, FieldValues, GenotypeField, ValueKind};
use crate::table::GenotypeTable;

/// Build a VCF header declaring every genotype field and sample of `table`.
pub fn build_header(table: &GenotypeTable) -> Result<vcf::Header> {
    let mut builder = vcf::Header::builder().set_file_format(FileFormat::new(4, 5));

    for field in &table.fields {
        builder = builder.add_format(field.name.clone(), format_map(field));
    }
    for sample in &table.samples {
        builder = builder.add_sample_name(sample.clone());
    }

    let mut header = builder.build();
    insert_other_record(
        &mut header,
        "source",
        format!("vcf_geno {}", env!("CARGO_PKG_VERSION")),
    )?;

    Ok(header)
}

fn format_map(field: &GenotypeField) -> Map<Format> {
    if field.name == format_key::GENOTYPE {
        return Map::<Format>::from(format_key::GENOTYPE);
    }

    let number = match (&field.values, field.depth) {
        (FieldValues::List(_), _) => Number::Unknown,
        (_, Depth::Scalar) => Number::Count(1),
        (_, Depth::Fixed(n)) => Number::Count(n),
    };
    let kind = field.values.nested_kind().unwrap_or(field.values.kind());
    let ty = match kind {
        ValueKind::Integer => Type::Integer,
        ValueKind::Float => Type::Float,
        ValueKind::Absent | ValueKind::Logical | ValueKind::Text | ValueKind::List => {
            Type::String
        }
    };

    Map::<Format>::new(number, ty, format!("{} genotype field", field.name))
}

fn insert_other_record(header: &mut vcf::Header, key: &str, value: String) -> Result<()> {
    let key: key::Other = key
        .parse()
        .map_err(|e| anyhow!("invalid header key {key}: {e}"))?;
    header
        .other_records_mut()
        .insert(key, Collection::Unstructured(vec![value]));
    Ok(())
}

/// Write `header` followed by the serialized record lines.
pub fn write_document<W>(writer: W, header: &vcf::Header, lines: &[String]) -> Result<()>
where
    W: Write,
{
    let mut writer = vcf::io::Writer::new(writer);
    writer
        .write_header(header)
        .context("failed to write VCF header")?;

    let inner = writer.get_mut();
    for line in lines {
        inner
            .write_all(line.as_bytes())
            .and_then(|()| inner.write_all(b"\n"))
            .context("failed to write VCF record")?;
    }
    inner.flush().context("failed to flush VCF output")?;
    Ok(())
}

/// Write a VCF file; paths ending in `.gz` are gzip-compressed.
pub fn write_vcf<P>(path: P, header: &vcf::Header, lines: &[String]) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .map(BufWriter::new)
        .with_context(|| format!("failed to create VCF file at {}", path.display()))?;

    if path.to_string_lossy().ends_with(".gz") {
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        write_document(&mut encoder, header, lines)?;
        encoder
            .finish()
            .and_then(|mut inner| inner.flush())
            .with_context(|| format!("failed to finish {}", path.display()))?;
    } else {
        write_document(file, header, lines)?;
    }

    tracing::info!(path = %path.display(), records = lines.len(), "wrote VCF");
    Ok(())
}
