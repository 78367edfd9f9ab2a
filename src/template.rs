//! Template plugin entry point
//!
//! The minimal contract every tix plugin satisfies: take the invocation
//! context and the argument list, emit diagnostics. Four lines, fixed order:
//!
//! ```text
//! plugin=<plugin_name>
//! ticket_root=<ticket_root>
//! argv=<rendered argument list>
//! ticket_id=<id or None>
//! ```
//!
//! The entry point holds no state between invocations and never mutates the
//! context, so identical inputs produce byte-identical output.

use std::io::{self, Write};

use crate::context::{PluginContext, TicketValue};

/// Runs the template plugin, writing the four diagnostic lines to `out`.
pub fn run<W: Write>(context: &PluginContext, argv: &[String], out: &mut W) -> io::Result<()> {
    writeln!(out, "plugin={}", context.plugin_name)?;
    writeln!(out, "ticket_root={}", context.ticket_root)?;
    writeln!(out, "argv={}", render_argv(argv))?;

    let id = context.ticket_id().unwrap_or(&TicketValue::Null);
    writeln!(out, "ticket_id={}", id)?;

    Ok(())
}

/// Runs the template plugin against locked stdout.
pub fn run_stdout(context: &PluginContext, argv: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(context, argv, &mut out)
}

/// Canonical rendering of an argument list.
///
/// Bracketed, comma-space separated, each element double-quoted with
/// debug-style escaping: `["a", "b"]`. An empty list renders as `[]`.
/// This rendering is part of the output contract; keep it stable.
pub fn render_argv<S: AsRef<str>>(argv: &[S]) -> String {
    let mut out = String::from("[");
    for (i, arg) in argv.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('"');
        out.extend(arg.as_ref().escape_debug());
        out.push('"');
    }
    out.push(']');
    out
}
