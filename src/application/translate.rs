use std::collections::HashMap;
use std::io::{BufRead, Write};

use bitflags::bitflags;
use log::{debug, warn};
use serde::Deserialize;

use crate::data_link::Pdu;
use crate::error::Result;
use crate::network::{Message, Registry};
use crate::transport::FragmentBuffer;
use crate::types::{Config, Pgn};

bitflags! {
    /// Output and error policy of a [`Translator`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TranslateFlags: u8 {
        /// Numeric records instead of labeled reports
        const NUMERIC = 0x01;
        /// Echo each input record as a `#` comment before its translation
        const VERBOSE = 0x02;
        /// Stop at the first bad record
        const STRICT = 0x04;
    }
}

impl Default for TranslateFlags {
    fn default() -> Self {
        TranslateFlags::NUMERIC
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub numeric: bool,
    pub verbose: bool,
    pub strict: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            numeric: true,
            verbose: false,
            strict: false,
        }
    }
}

impl TranslatorConfig {
    pub fn flags(&self) -> TranslateFlags {
        let mut flags = TranslateFlags::empty();
        flags.set(TranslateFlags::NUMERIC, self.numeric);
        flags.set(TranslateFlags::VERBOSE, self.verbose);
        flags.set(TranslateFlags::STRICT, self.strict);
        flags
    }
}

impl Config for TranslatorConfig {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Per-run translation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateStats {
    /// Input lines read, comments and blanks included
    pub lines: u64,
    /// Messages written
    pub translated: u64,
    /// Fragments buffered for a multi-packet message
    pub pending: u64,
    /// Records with a PGN nobody interprets
    pub skipped: u64,
    /// Records rejected
    pub errors: u64,
}

/// Line-oriented text record translator.
///
/// Typed records are re-printed in the selected format. `PDU` records are
/// re-derived from their PGN, with multi-packet groups buffered per PGN and
/// source address until complete.
pub struct Translator<'r> {
    flags: TranslateFlags,
    registry: &'r Registry,
    buffers: HashMap<(Pgn, u8), FragmentBuffer>,
    stats: TranslateStats,
}

impl Translator<'static> {
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_registry(config.flags(), Registry::global()))
    }
}

impl<'r> Translator<'r> {
    pub fn with_registry(flags: TranslateFlags, registry: &'r Registry) -> Self {
        Self {
            flags,
            registry,
            buffers: HashMap::new(),
            stats: TranslateStats::default(),
        }
    }

    pub fn flags(&self) -> TranslateFlags {
        self.flags
    }

    pub fn stats(&self) -> TranslateStats {
        self.stats
    }

    /// Translates one record, writing zero or one message to `out`
    pub fn translate_line(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        self.stats.lines += 1;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            return Ok(());
        }

        let tokens: Vec<&str> = record.split_whitespace().collect();
        match self.translate_record(&tokens) {
            Ok(Some(message)) => {
                if self.flags.contains(TranslateFlags::VERBOSE) {
                    writeln!(out, "# {}", record)?;
                }
                message.print(out, self.flags.contains(TranslateFlags::NUMERIC))?;
                self.stats.translated += 1;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) if self.flags.contains(TranslateFlags::STRICT) => {
                self.stats.errors += 1;
                Err(e)
            }
            Err(e) => {
                warn!("line {}: {}", self.stats.lines, e);
                self.stats.errors += 1;
                Ok(())
            }
        }
    }

    /// Translates every line of `input`
    pub fn translate<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<TranslateStats> {
        for line in input.lines() {
            self.translate_line(&line?, out)?;
        }
        out.flush()?;
        if !self.buffers.values().all(FragmentBuffer::is_empty) {
            warn!("input ended inside a multi-packet message");
        }
        Ok(self.stats)
    }

    fn translate_record(&mut self, tokens: &[&str]) -> Result<Option<Message>> {
        let registry = self.registry;
        let message = registry.import(tokens)?;
        let pdu = match message.downcast_ref::<Pdu>() {
            Some(pdu) => *pdu,
            None => return Ok(Some(message)),
        };

        let pgn = pdu.pgn();
        let interpreter = match registry.lookup_pdu(&pdu) {
            Ok(interpreter) => interpreter,
            Err(e) if self.flags.contains(TranslateFlags::STRICT) => return Err(e),
            Err(_) => {
                debug!("no interpreter for PGN 0x{:04X}", pgn);
                self.stats.skipped += 1;
                return Ok(None);
            }
        };

        if interpreter.fragments() == 1 {
            return interpreter.convert(&[pdu]).map(Some);
        }

        let fragments = interpreter.fragments();
        let buffer = self
            .buffers
            .entry((pgn, pdu.src_address))
            .or_insert_with(|| FragmentBuffer::new(pgn, fragments));
        match buffer.push(pdu)? {
            Some(complete) => interpreter.convert(&complete).map(Some),
            None => {
                self.stats.pending += 1;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JbusError;

    fn run(translator: &mut Translator<'_>, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            translator.translate_line(line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn rcfg_line(seq: u8) -> String {
        format!("PDU 01:00:00.000 6 0 0 0xFE 0xE1 0x10 8 {} 0 0 0 0 0 0 0", seq)
    }

    #[test]
    fn flags_follow_config() {
        assert_eq!(TranslatorConfig::default().flags(), TranslateFlags::NUMERIC);
        let config = TranslatorConfig {
            numeric: false,
            verbose: true,
            strict: true,
        };
        assert_eq!(config.flags(), TranslateFlags::VERBOSE | TranslateFlags::STRICT);
    }

    #[test]
    fn typed_records_are_reprinted() {
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        let text = run(&mut translator, &["RF 00:00:01.000 80.00 20.00"]);
        assert_eq!(text, "RF 00:00:01.000 80.00 20.00\n");
    }

    #[test]
    fn comments_and_blanks_are_ignored() {
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        assert_eq!(run(&mut translator, &["", "   ", "# header"]), "");
        assert_eq!(translator.stats().lines, 3);
        assert_eq!(translator.stats().translated, 0);
    }

    #[test]
    fn multi_packet_pdus_are_buffered() {
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        let lines: Vec<String> = (1..=3).map(rcfg_line).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let text = run(&mut translator, &refs);
        assert!(text.starts_with("RCFG 01:00:00.000 "), "{}", text);
        assert_eq!(text.lines().count(), 1);
        assert_eq!(translator.stats().pending, 2);
        assert_eq!(translator.stats().translated, 1);
    }

    #[test]
    fn multi_packet_stream_recovers_from_a_missing_start() {
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        let lines: Vec<String> = [2, 3, 1, 2, 3, 1, 2, 3].iter().map(|seq| rcfg_line(*seq)).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let text = run(&mut translator, &refs);
        assert_eq!(text.lines().filter(|line| line.starts_with("RCFG ")).count(), 2);
        assert_eq!(translator.stats().translated, 2);
        assert_eq!(translator.stats().errors, 2);
    }

    #[test]
    fn unknown_pgn_is_skipped() {
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        let text = run(&mut translator, &["PDU 01:00:00.000 0xFE 0xCA 0 1 2 3 4 5 6 7 8"]);
        assert_eq!(text, "");
        assert_eq!(translator.stats().skipped, 1);
        assert_eq!(translator.stats().errors, 0);
    }

    #[test]
    fn bad_records_count_as_errors() {
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        run(&mut translator, &["EBC1 01:00:00.000 1 2", "NOPE 01:00:00.000"]);
        assert_eq!(translator.stats().errors, 2);
    }

    #[test]
    fn strict_mode_propagates() {
        let config = TranslatorConfig {
            strict: true,
            ..TranslatorConfig::default()
        };
        let mut translator = Translator::new(&config).unwrap();
        let mut out = Vec::new();
        let err = translator
            .translate_line("PDU 01:00:00.000 0xFE 0xCA 0 1 2 3 4 5 6 7 8", &mut out)
            .unwrap_err();
        assert!(matches!(err, JbusError::UnsupportedPgn(0xFECA)));
        assert_eq!(translator.stats().errors, 1);
    }

    #[test]
    fn verbose_echoes_input() {
        let config = TranslatorConfig {
            verbose: true,
            ..TranslatorConfig::default()
        };
        let mut translator = Translator::new(&config).unwrap();
        let text = run(&mut translator, &["RF 00:00:01.000 80.00 20.00"]);
        assert_eq!(text, "# RF 00:00:01.000 80.00 20.00\nRF 00:00:01.000 80.00 20.00\n");
    }

    #[test]
    fn translate_reads_a_whole_stream() {
        let input = "# capture\nRF 00:00:01.000 80.00 20.00\nRF 00:00:02.000 -255.00 -255.00\n";
        let mut translator = Translator::new(&TranslatorConfig::default()).unwrap();
        let mut out = Vec::new();
        let stats = translator.translate(input.as_bytes(), &mut out).unwrap();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.translated, 2);
    }
}
