//! FASTA multiple sequence alignment, keyed by taxon label.

use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use noodles::{core::Position, fasta};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ----------------------------------------------------------------------------
// Record
// ----------------------------------------------------------------------------

/// A single aligned DNA sequence.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Record {
    /// Taxon label (the fasta record name).
    pub id: String,
    /// Aligned sequence bases, including gap characters.
    pub sequence: Vec<char>,
}

impl Record {
    /// Create a sequence [`Record`] from a [`noodles`] [`fasta::Record`].
    pub fn from_noodles(record: fasta::Record) -> Result<Self, Report> {
        let id = record.name().to_string();

        // convert sequence to vec of char bases, noodle positions are 1-based!
        let start = Position::try_from(1)?;
        let sequence = record
            .sequence()
            .get(start..)
            .wrap_err_with(|| format!("Failed to parse sequence record {id}"))?
            .iter()
            .map(|b| *b as char)
            .collect::<Vec<_>>();

        Ok(Record { id, sequence })
    }
}

// ----------------------------------------------------------------------------
// Alignment
// ----------------------------------------------------------------------------

/// A multiple sequence alignment of DNA records, keyed by taxon label.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Alignment {
    pub records: Vec<Record>,
}

impl Alignment {
    /// Reads an [`Alignment`] from a fasta file.
    ///
    /// All records must have the same aligned length.
    pub fn read<P>(path: &P) -> Result<Alignment, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let file = File::open(path.as_ref())
            .wrap_err_with(|| format!("Failed to open alignment: {path:?}"))?;
        let mut reader = fasta::Reader::new(BufReader::new(file));

        let records = reader
            .records()
            .map(|record| {
                let record =
                    record.wrap_err_with(|| format!("Failed to parse fasta record in {path:?}"))?;
                Record::from_noodles(record)
            })
            .collect::<Result<Vec<_>, Report>>()?;

        if records.is_empty() {
            Err(eyre!("No sequences found in alignment: {path:?}"))?
        }
        let length = records[0].sequence.len();
        if let Some(record) = records.iter().find(|r| r.sequence.len() != length) {
            Err(eyre!(
                "Sequence {} has length {}, but {} has length {length}.",
                record.id,
                record.sequence.len(),
                records[0].id
            )
            .suggestion(format!("Are the sequences in {path:?} aligned?")))?
        }

        Ok(Alignment { records })
    }

    /// Writes the [`Alignment`] to a fasta file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let file = File::create(path.as_ref())
            .wrap_err_with(|| format!("Failed to create alignment: {path:?}"))?;
        let mut writer = fasta::Writer::new(file);

        for record in &self.records {
            let definition = fasta::record::Definition::new(record.id.clone(), None);
            let bases = record.sequence.iter().map(|c| *c as u8).collect::<Vec<_>>();
            let record = fasta::Record::new(definition, fasta::record::Sequence::from(bases));
            writer
                .write_record(&record)
                .wrap_err_with(|| format!("Failed to write alignment: {path:?}"))?;
        }
        Ok(())
    }

    /// Returns `true` if the alignment has a sequence for the taxon.
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    /// Returns a new [`Alignment`] without the requested taxon's sequence.
    pub fn without(&self, id: &str) -> Alignment {
        let records = self.records.iter().filter(|record| record.id != id).cloned().collect();
        Alignment { records }
    }
}

#[cfg(test)]
mod tests;
