//! Structural call-frame wrapping.

use crate::describe::DescribeOptions;
use crate::error::InspectError;
use crate::host::{FrameInfo, Host, ScopeInfo};
use crate::protocol::{CallFrame, CallFrameId, Scope, SourceLocation};
use crate::session::Inspector;

/// Group scope and `this` wrappers are registered under.
const BACKTRACE_GROUP: &str = "backtrace";

impl<H: Host> Inspector<H> {
    /// Wraps a whole stack, top frame first.
    pub fn wrap_call_frames(&mut self, frames: &[FrameInfo<H::Value>]) -> Vec<CallFrame> {
        frames
            .iter()
            .enumerate()
            .map(|(ordinal, frame)| self.build_call_frame(ordinal as u32, frame))
            .collect()
    }

    /// Wraps the frame at `ordinal`, counted from the top of the stack.
    pub fn call_frame(
        &mut self,
        frames: &[FrameInfo<H::Value>],
        ordinal: u32,
    ) -> Result<CallFrame, InspectError> {
        let frame = frames
            .get(ordinal as usize)
            .ok_or(InspectError::InvalidOrdinal(ordinal))?;
        Ok(self.build_call_frame(ordinal, frame))
    }

    fn build_call_frame(&mut self, ordinal: u32, frame: &FrameInfo<H::Value>) -> CallFrame {
        let scope_chain = frame
            .scope_chain
            .iter()
            .map(|scope| self.wrap_scope(scope))
            .collect();
        let this = self.describe(
            &frame.this_value,
            DescribeOptions {
                group: Some(BACKTRACE_GROUP),
                ..DescribeOptions::default()
            },
        );
        CallFrame {
            call_frame_id: CallFrameId {
                session_id: self.session_id(),
                ordinal,
            },
            function_name: frame.function_name.clone(),
            location: SourceLocation {
                script_id: frame.script_id.clone(),
                line_number: frame.line,
                column_number: frame.column,
            },
            scope_chain,
            this,
        }
    }

    fn wrap_scope(&mut self, scope: &ScopeInfo<H::Value>) -> Scope {
        let empty = !self
            .host
            .own_properties(&scope.object)
            .iter()
            .any(|property| property.enumerable);
        Scope {
            kind: scope.kind,
            object: self.describe(
                &scope.object,
                DescribeOptions {
                    group: Some(BACKTRACE_GROUP),
                    ..DescribeOptions::default()
                },
            ),
            name: scope.name.clone(),
            empty,
        }
    }
}
