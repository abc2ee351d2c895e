//! Pre-call and post-call validation stages

use crate::core::error::ValdecError;
use crate::core::field::{Field, extract_fields};
use crate::core::invoker::{ValidationContext, run_validation};
use crate::core::rewriter::replace_args_kwargs;
use crate::core::selection::{RESULT_KEY, RETURN_NAME, Selection};
use crate::core::settings::Settings;
use crate::core::signature::Signature;
use crate::core::value::{CallArgs, Value};

/// The validation stages around one wrapped function
///
/// Holds only decoration-time state, so a single pipeline serves any number
/// of concurrent calls.
#[derive(Debug, Clone)]
pub struct Pipeline {
    signature: Signature,
    selection: Selection,
    settings: Settings,
}

impl Pipeline {
    pub fn new(signature: Signature, selection: Selection, settings: Settings) -> Self {
        Self {
            signature,
            selection,
            settings,
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate the selected arguments and apply any replacements
    pub fn before(&self, call: CallArgs) -> Result<CallArgs, ValdecError> {
        let fields = extract_fields(&self.signature, &call)?;
        let selected = self.selection.select(fields);
        if selected.is_empty() {
            return Ok(call);
        }

        tracing::debug!(
            fields = ?field_names(&selected),
            validator = self.settings.validator().name(),
            "Validating arguments"
        );

        let replacements = run_validation(
            &selected,
            self.settings.validator(),
            self.settings.replace_args(),
            self.settings.extra(),
            ValidationContext::Arguments,
        )?;

        match replacements {
            Some(replacements) => {
                tracing::trace!(
                    replaced = ?replacements.keys().collect::<Vec<_>>(),
                    "Replacing arguments"
                );
                Ok(replace_args_kwargs(&self.signature, call, replacements))
            }
            None => Ok(call),
        }
    }

    /// Validate the return value if selected and apply any replacement
    pub fn after(&self, result: Value) -> Result<Value, ValdecError> {
        let field = Field::new(RETURN_NAME, result.clone(), self.signature.effective_return());
        let selected: Vec<Field> = self
            .selection
            .select(vec![field])
            .into_iter()
            .map(|field| Field {
                name: RESULT_KEY.to_string(),
                ..field
            })
            .collect();
        if selected.is_empty() {
            return Ok(result);
        }

        tracing::debug!(
            annotation = %self.signature.effective_return(),
            validator = self.settings.validator().name(),
            "Validating result"
        );

        let replacement = run_validation(
            &selected,
            self.settings.validator(),
            self.settings.replace_result(),
            self.settings.extra(),
            ValidationContext::Result,
        )?
        .and_then(|mut replacements| replacements.shift_remove(RESULT_KEY));

        match replacement {
            Some(value) => {
                tracing::trace!("Replacing result");
                Ok(value)
            }
            None => Ok(result),
        }
    }
}

fn field_names(fields: &[Field]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signature::Parameter;
    use crate::core::types::{RecordSchema, TypeDescriptor};
    use serde_json::json;

    // (i_i_i_i: int, s: int, *args, k: int = None) -> int
    fn signature() -> Signature {
        Signature::builder()
            .arg("i_i_i_i", TypeDescriptor::Int)
            .arg("s", TypeDescriptor::Int)
            .param(Parameter::var_positional("args"))
            .param(
                Parameter::keyword_only("k")
                    .typed(TypeDescriptor::Int)
                    .default(Value::Null),
            )
            .returns(TypeDescriptor::Int)
            .build()
            .expect("valid signature")
    }

    fn pipeline(selection: Selection) -> Pipeline {
        Pipeline::new(signature(), selection, Settings::default())
    }

    #[test]
    fn test_before_passes_valid_arguments_through() {
        let call = CallArgs::new().arg(1).arg(2).arg(3).arg(4).kwarg("k", 5);
        let result = pipeline(Selection::all()).before(call.clone()).expect("valid");
        assert_eq!(result, call);
    }

    #[test]
    fn test_before_error_names_the_argument() {
        let call = CallArgs::new().arg("1").arg(2).arg(3).arg(4).kwarg("k", 5);
        let err = pipeline(Selection::all()).before(call).expect_err("invalid");
        assert!(matches!(err, ValdecError::Arguments(_)));
        assert!(err.to_string().contains("i_i_i_i"));
    }

    #[test]
    fn test_before_skips_unselected_arguments() {
        let call = CallArgs::new().arg("1").arg(2);
        assert!(pipeline(Selection::only(["s"])).before(call.clone()).is_ok());
        assert!(pipeline(Selection::except(["i_i_i_i"])).before(call).is_ok());
    }

    #[test]
    fn test_before_binding_failure_is_not_a_validation_error() {
        let err = pipeline(Selection::all())
            .before(CallArgs::new())
            .expect_err("missing arguments");
        assert!(matches!(err, ValdecError::Binding(_)));
    }

    #[test]
    fn test_after_validates_declared_return() {
        let p = pipeline(Selection::all());
        assert_eq!(p.after(Value::Int(1)).expect("valid"), Value::Int(1));

        let err = p.after(Value::from("1")).expect_err("not an int");
        assert!(matches!(err, ValdecError::Return(_)));
        assert!(err.to_string().contains("result"));
    }

    #[test]
    fn test_after_without_return_annotation_expects_none() {
        let p = Pipeline::new(
            Signature::builder().build().expect("valid signature"),
            Selection::all(),
            Settings::default(),
        );
        assert_eq!(p.after(Value::Null).expect("valid"), Value::Null);
        assert!(p.after(Value::from("1")).is_err());
    }

    #[test]
    fn test_after_respects_selection() {
        assert!(pipeline(Selection::only(["s"])).after(Value::from("x")).is_ok());
        assert!(pipeline(Selection::except([RETURN_NAME])).after(Value::from("x")).is_ok());
        assert!(pipeline(Selection::only([RETURN_NAME])).after(Value::from("x")).is_err());
    }

    #[test]
    fn test_after_replaces_result_with_record() {
        let profile = RecordSchema::new("Profile").field("age", TypeDescriptor::Int);
        let p = Pipeline::new(
            Signature::builder()
                .returns(TypeDescriptor::record(profile))
                .build()
                .expect("valid signature"),
            Selection::all(),
            Settings::default(),
        );
        let replaced = p.after(Value::from(json!({"age": 3}))).expect("valid");
        assert_eq!(replaced.as_record().map(|r| r.type_name()), Some("Profile"));

        let kept = Pipeline::new(
            p.signature().clone(),
            Selection::all(),
            Settings::default().with_replace_result(false),
        )
        .after(Value::from(json!({"age": 3})))
        .expect("valid");
        assert!(matches!(kept, Value::Map(_)));
    }
}
