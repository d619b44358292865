use std::io::Write;

use serde_json::{Map, Number, Value};

use crate::error::Result;
use crate::network::{Encoder, Message};

/// [`Encoder`] that builds a JSON object tree.
///
/// Objects opened with `start_object` nest inside the current one; keys added
/// at the top level land in the root object.
#[derive(Debug, Default)]
pub struct JsonEncoder {
    stack: Vec<(String, Map<String, Value>)>,
    root: Map<String, Value>,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Map<String, Value> {
        match self.stack.last_mut() {
            Some((_, object)) => object,
            None => &mut self.root,
        }
    }

    /// Closes any open objects and returns the root
    pub fn finish(mut self) -> Value {
        while !self.stack.is_empty() {
            self.end_object();
        }
        Value::Object(self.root)
    }

    pub fn write_to(self, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(&mut *out, &self.finish())?;
        writeln!(out)?;
        Ok(())
    }
}

impl Encoder for JsonEncoder {
    fn start_object(&mut self, name: &str) {
        self.stack.push((name.to_string(), Map::new()));
    }

    fn end_object(&mut self) {
        if let Some((name, object)) = self.stack.pop() {
            self.current().insert(name, Value::Object(object));
        }
    }

    fn add_int(&mut self, key: &str, value: i64) {
        self.current().insert(key.to_string(), Value::from(value));
    }

    fn add_real(&mut self, key: &str, value: f64) {
        let value = Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.current().insert(key.to_string(), value);
    }
}

/// Publishes one message into a fresh JSON object
pub fn to_json(message: &Message) -> Value {
    let mut encoder = JsonEncoder::new();
    message.publish(&mut encoder);
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::messages::test_util::pdu;
    use crate::network::messages::PGN_RF;
    use crate::network::Registry;
    use serde_json::json;

    #[test]
    fn nests_objects() {
        let mut encoder = JsonEncoder::new();
        encoder.start_object("@X");
        encoder.add_int("a", 1);
        encoder.start_object("b");
        encoder.add_real("0", 0.5);
        encoder.end_object();
        encoder.end_object();
        assert_eq!(encoder.finish(), json!({"@X": {"a": 1, "b": {"0": 0.5}}}));
    }

    #[test]
    fn non_finite_reals_become_null() {
        let mut encoder = JsonEncoder::new();
        encoder.add_real("x", f64::NAN);
        assert_eq!(encoder.finish(), json!({"x": null}));
    }

    #[test]
    fn unclosed_objects_are_closed_on_finish() {
        let mut encoder = JsonEncoder::new();
        encoder.start_object("outer");
        encoder.start_object("inner");
        encoder.add_int("n", 7);
        assert_eq!(encoder.finish(), json!({"outer": {"inner": {"n": 7}}}));
    }

    #[test]
    fn publishes_a_message() {
        let message = Registry::global()
            .convert(&[pdu(PGN_RF, &[0xFF, 60, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])])
            .unwrap();
        let value = to_json(&message);
        assert_eq!(
            value,
            json!({
                "@RF": {
                    "timestamp": {"hour": 12, "minute": 34, "second": 56, "millisecond": 789},
                    "pressure": -255.0,
                    "oil_temp": 20.0
                }
            })
        );
    }
}
