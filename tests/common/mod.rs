//! Shared fixtures for integration tests: writes small references as plain
//! FASTA or BGZF, each with its `.fai` (and `.gzi`) alongside.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use noodles::bgzf;

/// The first 60 bases of the human mitochondrial genome
pub const CHRM_PREFIX: &str = "GATCACAGGTCTATCACCCTATTAACCACTCACGGGAGCTCTCCATGCATTTGGTATTTT";

/// One contig of a test reference
#[derive(Debug, Clone)]
pub struct TestContig {
    pub name: String,
    pub description: Option<String>,
    pub bases: String,
    pub line_width: usize,
}

impl TestContig {
    pub fn new(name: &str, bases: impl Into<String>, line_width: usize) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            bases: bases.into(),
            line_width,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Deterministic pseudo-random bases
pub fn random_bases(len: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            b"ACGT"[(state >> 62) as usize] as char
        })
        .collect()
}

/// A small reference with mixed line widths, soft-masked bases, a
/// single-base contig and a contig whose length is a multiple of its width
pub fn sample_contigs() -> Vec<TestContig> {
    let chrm = format!("{CHRM_PREFIX}{}", random_bases(140, 1));

    let mut chr1 = random_bases(317, 2);
    let masked = chr1[100..150].to_ascii_lowercase();
    chr1.replace_range(100..150, &masked);

    vec![
        TestContig::new("chrM", chrm, 60).with_description("mitochondrion"),
        TestContig::new("chr1", chr1, 50),
        TestContig::new("chr2", "N", 13),
        TestContig::new("chr3", random_bases(40, 3), 20),
    ]
}

/// FASTA text with the given line terminator
pub fn fasta_text(contigs: &[TestContig], eol: &str) -> String {
    let mut text = String::new();
    for contig in contigs {
        text.push('>');
        text.push_str(&contig.name);
        if let Some(description) = &contig.description {
            text.push(' ');
            text.push_str(description);
        }
        text.push_str(eol);
        for line in contig.bases.as_bytes().chunks(contig.line_width) {
            text.push_str(std::str::from_utf8(line).unwrap());
            text.push_str(eol);
        }
    }
    text
}

/// `.fai` text matching `fasta_text(contigs, eol)`
pub fn fai_text(contigs: &[TestContig], eol: &str) -> String {
    let mut text = String::new();
    let mut offset = 0usize;
    for contig in contigs {
        let header_len = 1
            + contig.name.len()
            + contig.description.as_ref().map_or(0, |d| d.len() + 1)
            + eol.len();
        offset += header_len;

        text.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            contig.name,
            contig.bases.len(),
            offset,
            contig.line_width,
            contig.line_width + eol.len()
        ));

        let n_lines = contig.bases.len().div_ceil(contig.line_width);
        offset += contig.bases.len() + n_lines * eol.len();
    }
    text
}

/// Write `<dir>/<name>` and `<dir>/<name>.fai`
pub fn write_plain(dir: &Path, name: &str, contigs: &[TestContig], eol: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, fasta_text(contigs, eol)).unwrap();
    std::fs::write(append(&path, "fai"), fai_text(contigs, eol)).unwrap();
    path
}

/// Write `<dir>/<name>` as BGZF with blocks of at most `chunk` uncompressed
/// bytes, plus `<name>.fai` and `<name>.gzi`
pub fn write_bgzf(dir: &Path, name: &str, contigs: &[TestContig], chunk: usize) -> PathBuf {
    let path = dir.join(name);
    let (file, gzi) = bgzf(fasta_text(contigs, "\n").as_bytes(), chunk);
    std::fs::write(&path, file).unwrap();
    std::fs::write(append(&path, "fai"), fai_text(contigs, "\n")).unwrap();
    std::fs::write(append(&path, "gzi"), gzi).unwrap();
    path
}

pub fn append(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// BGZF-compress `data` in blocks of at most `chunk` bytes, returning the
/// file contents and its `.gzi` table
pub fn bgzf(data: &[u8], chunk: usize) -> (Vec<u8>, Vec<u8>) {
    let mut writer = bgzf::Writer::new(Vec::new());
    let mut entries = Vec::new();
    for (i, piece) in data.chunks(chunk).enumerate() {
        if i > 0 {
            entries.push((writer.position(), (i * chunk) as u64));
        }
        writer.write_all(piece).unwrap();
        writer.flush().unwrap();
    }
    let file = writer.finish().unwrap();

    let mut gzi = (entries.len() as u64).to_le_bytes().to_vec();
    for (c, u) in entries {
        gzi.extend_from_slice(&c.to_le_bytes());
        gzi.extend_from_slice(&u.to_le_bytes());
    }
    (file, gzi)
}
