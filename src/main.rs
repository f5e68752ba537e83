use anyhow::Result;

fn main() -> Result<()> {
    vcf_geno::cli::run()
}
