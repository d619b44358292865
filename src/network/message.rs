use std::io::Write;

use super::interpreter::{print_message, publish_message, Encoder, FieldVisitor, J1939Message};
use super::messages::*;
use crate::data_link::Pdu;
use crate::error::Result;
use crate::types::{Pgn, Timestamp};

/// Conversion between a typed record and the [`Message`] sum type
pub trait MessageVariant: Sized {
    fn into_message(self) -> Message;
    fn from_message(message: &Message) -> Option<&Self>;
}

macro_rules! messages {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// A decoded J1939 message, one variant per supported parameter group
        #[derive(Debug, Clone, PartialEq)]
        pub enum Message {
            $($variant($ty),)+
        }

        impl Message {
            /// Record tag, e.g. `"EBC1"`
            pub fn name(&self) -> &'static str {
                match self {
                    $(Message::$variant(_) => <$ty as J1939Message>::NAME,)+
                }
            }

            pub fn pgn(&self) -> Pgn {
                match self {
                    $(Message::$variant(m) => J1939Message::pgn(m),)+
                }
            }

            pub fn timestamp(&self) -> Timestamp {
                match self {
                    $(Message::$variant(m) => J1939Message::timestamp(m),)+
                }
            }

            pub fn visit(&self, visitor: &mut dyn FieldVisitor) {
                match self {
                    $(Message::$variant(m) => m.visit(visitor),)+
                }
            }

            /// Writes a numeric line or a labeled report
            pub fn print(&self, out: &mut dyn Write, numeric: bool) -> Result<()> {
                match self {
                    $(Message::$variant(m) => print_message(m, out, numeric),)+
                }
            }

            pub fn publish(&self, encoder: &mut dyn Encoder) {
                match self {
                    $(Message::$variant(m) => publish_message(m, encoder),)+
                }
            }
        }

        $(
            impl MessageVariant for $ty {
                fn into_message(self) -> Message {
                    Message::$variant(self)
                }

                fn from_message(message: &Message) -> Option<&Self> {
                    match message {
                        Message::$variant(m) => Some(m),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Message {
                fn from(m: $ty) -> Self {
                    Message::$variant(m)
                }
            }
        )+
    };
}

messages! {
    Pdu(Pdu),
    Tsc1(Tsc1),
    Exac(Exac),
    Ebc1(Ebc1),
    Ebc2(Ebc2),
    Eec1(Eec1),
    Eec2(Eec2),
    Eec3(Eec3),
    Erc1(Erc1),
    Etc1(Etc1),
    Etc2(Etc2),
    Turbo(Turbo),
    Vd(Vd),
    Rcfg(Rcfg),
    Ecfg(Ecfg),
    Etemp(Etemp),
    Pto(Pto),
    Ccvs(Ccvs),
    Lfe(Lfe),
    Ambc(Ambc),
    Iec(Iec),
    Vep(Vep),
    Tf(Tf),
    Rf(Rf),
    Dd(Dd),
    Hrvd(Hrvd),
    Fd(Fd),
    Gfi2(Gfi2),
    Ei(Ei),
}

impl Message {
    /// Typed view of the message, `None` if it holds another variant
    pub fn downcast_ref<M: MessageVariant>(&self) -> Option<&M> {
        M::from_message(self)
    }
}
