//! Argument classification.
//!
//! Splits the arguments of an operation into the receiver (the implicit
//! `this`), the return value, and the explicit parameter list. Only required,
//! non-deprecated arguments take part; everything else travels through the
//! option bag and is never rendered individually.

use crate::error::Result;
use crate::registry::{ArgumentFlags, OperationRegistry, ValueTypeKind};

/// An operation argument with everything the classifier needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Argument name as reported by the registry.
    pub name: String,
    /// Value-type identifier.
    pub value_type: String,
    /// How `value_type` is translated.
    pub kind: ValueTypeKind,
    /// Argument flags.
    pub flags: ArgumentFlags,
    /// Sort key; lower first.
    pub priority: i32,
}

impl Argument {
    /// Whether the argument is rendered individually.
    pub fn is_required(&self) -> bool {
        self.flags.contains(ArgumentFlags::REQUIRED)
            && !self.flags.contains(ArgumentFlags::DEPRECATED)
    }

    /// Whether the argument is written by the operation.
    pub fn is_output(&self) -> bool {
        self.flags.contains(ArgumentFlags::OUTPUT)
    }

    /// Whether the argument is read by the operation.
    pub fn is_input(&self) -> bool {
        self.flags.contains(ArgumentFlags::INPUT)
    }
}

/// Result of classifying an operation's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArguments<'a> {
    /// First required input image, used as the call target.
    pub receiver: Option<&'a Argument>,
    /// First required output, used as the return type.
    pub result: Option<&'a Argument>,
    /// Required arguments other than receiver and result, by priority.
    pub parameters: Vec<&'a Argument>,
}

/// Read every argument of `operation` from the registry, in registry order.
pub fn collect_arguments<R: OperationRegistry>(
    registry: &R,
    operation: &R::Operation,
) -> Result<Vec<Argument>> {
    registry
        .properties(operation)?
        .into_iter()
        .map(|property| {
            let flags = registry.flags(operation, &property.name)?;
            let priority = registry.priority(operation, &property.name)?;
            let kind = registry.value_type_kind(&property.value_type);
            Ok(Argument {
                name: property.name,
                value_type: property.value_type,
                kind,
                flags,
                priority,
            })
        })
        .collect()
}

/// Required, non-deprecated arguments sorted by priority.
///
/// The sort is stable: equal priorities keep registry order.
pub fn required_arguments(arguments: &[Argument]) -> Vec<&Argument> {
    let mut required: Vec<&Argument> = arguments.iter().filter(|a| a.is_required()).collect();
    required.sort_by_key(|a| a.priority);
    required
}

/// Classify `arguments`. `is_image` decides which value types can be a receiver.
pub fn classify<'a>(
    arguments: &'a [Argument],
    is_image: impl Fn(&str) -> bool,
) -> ClassifiedArguments<'a> {
    let required = required_arguments(arguments);

    let result = required.iter().position(|a| a.is_output());
    let receiver = required
        .iter()
        .position(|a| a.is_input() && is_image(&a.value_type));

    let parameters = required
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != result && Some(*idx) != receiver)
        .map(|(_, arg)| *arg)
        .collect();

    ClassifiedArguments {
        receiver: receiver.map(|idx| required[idx]),
        result: result.map(|idx| required[idx]),
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(name: &str, value_type: &str, flags: ArgumentFlags, priority: i32) -> Argument {
        Argument {
            name: name.to_string(),
            value_type: value_type.to_string(),
            kind: ValueTypeKind::Primitive,
            flags,
            priority,
        }
    }

    const IN: ArgumentFlags = ArgumentFlags::REQUIRED.union(ArgumentFlags::INPUT);
    const OUT: ArgumentFlags = ArgumentFlags::REQUIRED.union(ArgumentFlags::OUTPUT);

    fn is_image(value_type: &str) -> bool {
        value_type == "VipsImage"
    }

    fn names(args: &[&Argument]) -> Vec<String> {
        args.iter().map(|a| a.name.clone()).collect()
    }

    #[test]
    fn test_optional_and_deprecated_are_dropped() {
        let args = vec![
            arg("in", "VipsImage", IN, 0),
            arg("scale", "gdouble", ArgumentFlags::INPUT, 1),
            arg("old", "gint", IN | ArgumentFlags::DEPRECATED, 2),
        ];
        assert_eq!(names(&required_arguments(&args)), ["in"]);
    }

    #[test]
    fn test_sort_is_stable_by_priority() {
        let args = vec![
            arg("c", "gint", IN, 5),
            arg("a", "gint", IN, 1),
            arg("d", "gint", IN, 5),
            arg("b", "gint", IN, 1),
            arg("e", "gint", IN, -3),
        ];
        assert_eq!(
            names(&required_arguments(&args)),
            ["e", "a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_binary_operation() {
        let args = vec![
            arg("out", "VipsImage", OUT, 2),
            arg("left", "VipsImage", IN, 0),
            arg("right", "VipsImage", IN, 1),
        ];
        let classified = classify(&args, is_image);

        assert_eq!(classified.receiver.map(|a| a.name.as_str()), Some("left"));
        assert_eq!(classified.result.map(|a| a.name.as_str()), Some("out"));
        assert_eq!(names(&classified.parameters), ["right"]);
    }

    #[test]
    fn test_receiver_must_be_image() {
        let args = vec![
            arg("width", "gint", IN, 0),
            arg("height", "gint", IN, 1),
            arg("out", "VipsImage", OUT, 2),
        ];
        let classified = classify(&args, is_image);

        assert!(classified.receiver.is_none());
        assert_eq!(names(&classified.parameters), ["width", "height"]);
    }

    #[test]
    fn test_first_output_is_result_and_later_outputs_stay() {
        let args = vec![
            arg("in", "VipsImage", IN, 0),
            arg("x", "gint", OUT, 2),
            arg("out", "gdouble", OUT, 1),
        ];
        let classified = classify(&args, is_image);

        assert_eq!(classified.result.map(|a| a.name.as_str()), Some("out"));
        assert_eq!(names(&classified.parameters), ["x"]);
    }

    #[test]
    fn test_output_image_is_never_receiver() {
        let args = vec![arg("out", "VipsImage", OUT, 0)];
        let classified = classify(&args, is_image);

        assert!(classified.receiver.is_none());
        assert_eq!(classified.result.map(|a| a.name.as_str()), Some("out"));
        assert!(classified.parameters.is_empty());
    }

    #[test]
    fn test_no_required_arguments() {
        let args = vec![arg("scale", "gdouble", ArgumentFlags::INPUT, 0)];
        let classified = classify(&args, is_image);

        assert!(classified.receiver.is_none());
        assert!(classified.result.is_none());
        assert!(classified.parameters.is_empty());
    }

    #[test]
    fn test_source_arguments_are_untouched() {
        let args = vec![arg("in", "VipsImage", IN, 0), arg("out", "VipsImage", OUT, 1)];
        let before = args.clone();
        let _ = classify(&args, is_image);
        assert_eq!(args, before);
    }
}
