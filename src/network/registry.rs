use std::collections::HashMap;

use log::{debug, warn};
use once_cell::sync::Lazy;

use super::interpreter::{Interp, Interpreter};
use super::message::Message;
use super::messages::*;
use crate::data_link::Pdu;
use crate::error::{JbusError, Result};
use crate::types::Pgn;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// PGN to interpreter map.
///
/// Built once, then only read; a shared reference can be used from any
/// number of threads.
pub struct Registry {
    interpreters: HashMap<Pgn, Box<dyn Interpreter>>,
    names: HashMap<&'static str, Pgn>,
    fallback: PduInterpreter,
}

fn builtin_interpreters() -> Vec<Box<dyn Interpreter>> {
    let tsc1 = TSC1_DESTINATIONS
        .iter()
        .map(|dest| Box::new(Interp::<Tsc1>::at(PGN_TSC1 | Pgn::from(*dest))) as Box<dyn Interpreter>);
    tsc1.chain(vec![
        Box::new(Interp::<Exac>::new()) as Box<dyn Interpreter>,
        Box::new(Interp::<Erc1>::new()),
        Box::new(Interp::<Ebc1>::new()),
        Box::new(Interp::<Etc1>::new()),
        Box::new(Interp::<Eec2>::new()),
        Box::new(Interp::<Eec1>::new()),
        Box::new(Interp::<Etc2>::new()),
        Box::new(Interp::<Gfi2>::new()),
        Box::new(Interp::<Ei>::new()),
        Box::new(Interp::<Fd>::new()),
        Box::new(Interp::<Ebc2>::new()),
        Box::new(Interp::<Hrvd>::new()),
        Box::new(Interp::<Turbo>::new()),
        Box::new(Interp::<Eec3>::new()),
        Box::new(Interp::<Vd>::new()),
        Box::new(Interp::<Rcfg>::new()),
        Box::new(Interp::<Ecfg>::new()),
        Box::new(Interp::<Etemp>::new()),
        Box::new(Interp::<Pto>::new()),
        Box::new(Interp::<Ccvs>::new()),
        Box::new(Interp::<Lfe>::new()),
        Box::new(Interp::<Ambc>::new()),
        Box::new(Interp::<Iec>::new()),
        Box::new(Interp::<Vep>::new()),
        Box::new(Interp::<Tf>::new()),
        Box::new(Interp::<Rf>::new()),
        Box::new(Interp::<Dd>::new()),
    ])
    .collect()
}

impl Registry {
    /// Registry holding every built-in interpreter
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for interpreter in builtin_interpreters() {
            if let Err(e) = registry.register(interpreter) {
                warn!("skipping built-in interpreter: {}", e);
            }
        }
        debug!("J1939 registry built with {} interpreters", registry.len());
        registry
    }

    /// Registry with only the PDU fallback
    pub fn empty() -> Self {
        Self {
            interpreters: HashMap::new(),
            names: HashMap::new(),
            fallback: PduInterpreter,
        }
    }

    /// Process-wide registry of the built-in interpreters
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Adds an interpreter under its PGN.
    ///
    /// The first interpreter registered for a name is the one name lookups
    /// return.
    pub fn register(&mut self, interpreter: Box<dyn Interpreter>) -> Result<()> {
        let pgn = interpreter.pgn();
        if self.interpreters.contains_key(&pgn) {
            return Err(JbusError::DuplicatePgn(pgn));
        }
        self.names.entry(interpreter.name()).or_insert(pgn);
        self.interpreters.insert(pgn, interpreter);
        Ok(())
    }

    pub fn lookup(&self, pgn: Pgn) -> Result<&dyn Interpreter> {
        self.interpreters
            .get(&pgn)
            .map(|interpreter| interpreter.as_ref())
            .ok_or(JbusError::UnsupportedPgn(pgn))
    }

    pub fn lookup_pdu(&self, pdu: &Pdu) -> Result<&dyn Interpreter> {
        self.lookup(pdu.pgn())
    }

    /// Interpreter for a record tag; `"PDU"` names the fallback
    pub fn lookup_name(&self, name: &str) -> Result<&dyn Interpreter> {
        if name == self.fallback.name() {
            return Ok(&self.fallback);
        }
        let pgn = self
            .names
            .get(name)
            .ok_or_else(|| JbusError::UnknownMessage(name.to_string()))?;
        self.lookup(*pgn)
    }

    /// Interpreter for `pgn`, or the PDU fallback when none is registered
    pub fn lookup_or_fallback(&self, pgn: Pgn) -> &dyn Interpreter {
        self.lookup(pgn).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &dyn Interpreter {
        &self.fallback
    }

    pub fn contains(&self, pgn: Pgn) -> bool {
        self.interpreters.contains_key(&pgn)
    }

    /// Decodes one message from its PDUs, dispatching on the first PDU's PGN
    pub fn convert(&self, pdus: &[Pdu]) -> Result<Message> {
        let first = pdus
            .first()
            .ok_or_else(|| JbusError::InvalidFrame("no PDUs to convert".into()))?;
        self.lookup_pdu(first)?.convert(pdus)
    }

    /// Parses a tokenized numeric record, dispatching on its name token
    pub fn import(&self, tokens: &[&str]) -> Result<Message> {
        let name = tokens
            .first()
            .ok_or_else(|| JbusError::malformed("?", "empty record"))?;
        self.lookup_name(name)?.import(tokens)
    }

    /// Registered PGNs in ascending order
    pub fn pgns(&self) -> Vec<Pgn> {
        let mut pgns: Vec<Pgn> = self.interpreters.keys().copied().collect();
        pgns.sort_unstable();
        pgns
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Interpreter> {
        self.interpreters.values().map(|interpreter| interpreter.as_ref())
    }

    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::interpreter::PGN_UNINTERPRETED;
    use crate::network::messages::test_util::pdu;

    #[test]
    fn builtins_are_registered() {
        let registry = Registry::new();
        assert_eq!(registry.len(), 31);
        for pgn in [PGN_EBC1, PGN_RCFG, PGN_ECFG, PGN_GFI2, PGN_EXAC, PGN_TSC1_EXHAUST_RETARDER] {
            assert!(registry.contains(pgn), "missing 0x{:04X}", pgn);
        }
    }

    #[test]
    fn ebc1_pdu_resolves_to_ebc1_only() {
        let registry = Registry::global();
        let raw = pdu(PGN_EBC1, &[0; 8]);
        assert_eq!(registry.lookup_pdu(&raw).unwrap().name(), "EBC1");
        let claimants: Vec<&str> = registry
            .iter()
            .filter(|interpreter| interpreter.is_type(&raw))
            .map(|interpreter| interpreter.name())
            .collect();
        assert_eq!(claimants, vec!["EBC1"]);
        assert!(!registry.fallback().is_type(&raw));
    }

    #[test]
    fn every_registered_pgn_claims_its_pdu() {
        let registry = Registry::global();
        for pgn in registry.pgns() {
            let raw = pdu(pgn, &[1, 0, 0, 0, 0, 0, 0, 0]);
            let interpreter = registry.lookup(pgn).unwrap();
            assert!(interpreter.is_type(&raw), "{} rejects 0x{:04X}", interpreter.name(), pgn);
            assert_eq!(registry.lookup_pdu(&raw).unwrap().pgn(), pgn);
            let claimants = registry.iter().filter(|other| other.is_type(&raw)).count();
            assert_eq!(claimants, 1, "0x{:04X} claimed {} times", pgn, claimants);
        }
        for dest in TSC1_DESTINATIONS {
            assert!(registry.contains(PGN_TSC1 | Pgn::from(dest)));
        }
    }

    #[test]
    fn unknown_pgn_is_an_error() {
        let registry = Registry::new();
        assert!(matches!(
            registry.lookup(0xFECA),
            Err(JbusError::UnsupportedPgn(0xFECA))
        ));
        assert_eq!(registry.lookup_or_fallback(0xFECA).pgn(), PGN_UNINTERPRETED);
        assert!(registry.convert(&[pdu(0xFECA, &[0; 8])]).is_err());
    }

    #[test]
    fn names_resolve() {
        let registry = Registry::new();
        assert_eq!(registry.lookup_name("TSC1").unwrap().pgn(), PGN_TSC1);
        assert_eq!(registry.lookup_name("ECFG").unwrap().fragments(), 4);
        assert_eq!(registry.lookup_name("PDU").unwrap().pgn(), PGN_UNINTERPRETED);
        assert!(matches!(
            registry.lookup_name("XYZ"),
            Err(JbusError::UnknownMessage(_))
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::empty();
        assert!(registry.is_empty());
        registry.register(Box::new(Interp::<Ebc1>::new())).unwrap();
        assert!(matches!(
            registry.register(Box::new(Interp::<Ebc1>::new())),
            Err(JbusError::DuplicatePgn(PGN_EBC1))
        ));
        assert_eq!(registry.pgns(), vec![PGN_EBC1]);
    }

    #[test]
    fn registry_is_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let raw = pdu(PGN_EEC1, &[0; 8]);
                    Registry::global().convert(&[raw]).unwrap().name()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "EEC1");
        }
    }
}
