//! Writes validator replacements back into a call's arguments

use crate::core::signature::{ParamKind, Signature};
use crate::core::value::{CallArgs, Value};
use crate::validators::Replacements;

/// Rebuild `call` with each replaced parameter overwritten in place
///
/// A name supplied as a keyword keeps its keyword slot, a positional name keeps
/// its positional slot. Variadic names always target their surplus arguments,
/// even when a surplus keyword shares the name. Everything not named in
/// `replacements` is untouched.
pub fn replace_args_kwargs(
    signature: &Signature,
    mut call: CallArgs,
    replacements: Replacements,
) -> CallArgs {
    for (name, value) in replacements {
        let kind = signature.parameter(&name).map(|p| p.kind);

        let keyword_slot = matches!(
            kind,
            Some(ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly)
        );
        if keyword_slot && call.kwargs.contains_key(&name) {
            call.kwargs.insert(name, value);
            continue;
        }

        match kind {
            Some(ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword) => {
                match signature.position_of(&name) {
                    Some(pos) if pos < call.args.len() => call.args[pos] = value,
                    _ => skip(&name, "not supplied positionally"),
                }
            }
            Some(ParamKind::VarPositional) => {
                let start = signature.positional_count().min(call.args.len());
                match value {
                    Value::List(items) => {
                        call.args.truncate(start);
                        call.args.extend(items);
                    }
                    _ => skip(&name, "variadic positional replacement is not a list"),
                }
            }
            Some(ParamKind::VarKeyword) => match value {
                Value::Map(fields) => call.kwargs.extend(fields),
                Value::Record(record) => call.kwargs.extend(record.into_fields()),
                _ => skip(&name, "variadic keyword replacement is not a mapping"),
            },
            Some(ParamKind::KeywordOnly) => skip(&name, "not supplied as a keyword"),
            None => skip(&name, "no such parameter"),
        }
    }
    call
}

fn skip(name: &str, reason: &str) {
    tracing::warn!(parameter = %name, reason, "Ignoring replacement");
}
