//! `:FORMat:BORDer`

use super::subsystem;
use crate::dispatcher::{SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::ByteOrder;

subsystem! {
    /// `:FORM` subsystem.
    Format
}

impl<S: Session> Format<'_, S> {
    /// `:FORM:BORD`: byte order of binary block transfers.
    pub fn set_byte_order(&mut self, order: ByteOrder) -> AwgResult<SetOutcome> {
        self.d.set_value(":FORM:BORD", order)
    }

    /// `:FORM:BORD?`
    pub fn byte_order(&mut self) -> AwgResult<Timed<ByteOrder>> {
        self.d.query_as(":FORM:BORD?")
    }
}
