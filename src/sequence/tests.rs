use crate::sequence::Alignment;

use color_eyre::eyre::{Report, Result};
use std::io::Write;
use tempfile::NamedTempFile;

const FASTA: &str = ">A
ACGT-CGT
>B
ACGTACGT
>C
TCGTACGA
";

fn write_fasta(content: &str) -> Result<NamedTempFile, Report> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn read_alignment() -> Result<(), Report> {
    let file = write_fasta(FASTA)?;
    let alignment = Alignment::read(&file.path())?;

    assert_eq!(alignment.records.len(), 3);
    assert!(alignment.contains("A"));
    assert!(alignment.contains("B"));
    assert!(!alignment.contains("D"));
    assert_eq!(alignment.records[0].sequence.len(), 8);
    Ok(())
}

#[test]
fn read_empty_alignment_is_an_error() -> Result<(), Report> {
    let file = write_fasta("")?;
    assert!(Alignment::read(&file.path()).is_err());
    Ok(())
}

#[test]
fn read_unaligned_sequences_is_an_error() -> Result<(), Report> {
    let file = write_fasta(">A\nACGT\n>B\nAC\n")?;
    assert!(Alignment::read(&file.path()).is_err());
    Ok(())
}

#[test]
fn without_excludes_taxon() -> Result<(), Report> {
    let file = write_fasta(FASTA)?;
    let alignment = Alignment::read(&file.path())?;

    let pruned = alignment.without("B");
    assert_eq!(pruned.records.len(), 2);
    assert!(!pruned.contains("B"));
    assert!(pruned.contains("A"));

    // the full alignment is unmodified
    assert!(alignment.contains("B"));
    Ok(())
}

#[test]
fn write_read_roundtrip() -> Result<(), Report> {
    let file = write_fasta(FASTA)?;
    let alignment = Alignment::read(&file.path())?;

    let output = NamedTempFile::new()?;
    alignment.write(&output.path())?;
    let observed = Alignment::read(&output.path())?;
    assert_eq!(observed, alignment);
    Ok(())
}
