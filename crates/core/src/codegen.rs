//! Classified arguments -> C++ declaration IR.
//!
//! This is where value types are resolved and the rendering markers are
//! chosen. An unresolvable type is fatal for the whole run.

use crate::classify::{Argument, ClassifiedArguments};
use crate::config::GeneratorConfig;
use crate::emit::{CppDeclaration, CppParam, Emit};
use crate::error::{GenerateError, Result};
use crate::types::TypeMapper;

/// Rendering markers taken from the generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationStyle {
    /// Prefix for declarations without a receiver.
    pub static_marker: String,
    /// Return type when there is no result.
    pub void_type: String,
    /// Trailing option-bag parameter.
    pub option_bag: String,
}

impl Default for DeclarationStyle {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl DeclarationStyle {
    /// Take the markers from `config`.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            static_marker: config.static_marker.clone(),
            void_type: config.void_type.clone(),
            option_bag: config.option_bag.clone(),
        }
    }
}

/// Turn a registry argument name into a C++ identifier.
pub fn cppize(name: &str) -> String {
    name.replace('-', "_")
}

fn resolve_argument(mapper: &TypeMapper, nickname: &str, argument: &Argument) -> Result<String> {
    mapper
        .resolve(&argument.value_type, argument.kind)
        .ok_or_else(|| GenerateError::UnknownType {
            nickname: nickname.to_string(),
            property: argument.name.clone(),
            value_type: argument.value_type.clone(),
        })
}

/// Build the declaration IR for one classified operation.
///
/// The receiver only decides whether the declaration is static; it is never
/// listed as a parameter.
pub fn codegen_declaration(
    nickname: &str,
    classified: &ClassifiedArguments<'_>,
    mapper: &TypeMapper,
    style: &DeclarationStyle,
) -> Result<CppDeclaration> {
    let qualifier = classified
        .receiver
        .is_none()
        .then(|| style.static_marker.clone());

    let return_type = match classified.result {
        Some(result) => resolve_argument(mapper, nickname, result)?,
        None => style.void_type.clone(),
    };

    let params = classified
        .parameters
        .iter()
        .map(|argument| {
            Ok(CppParam {
                ty: resolve_argument(mapper, nickname, argument)?,
                by_pointer: argument.is_output(),
                name: cppize(&argument.name),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CppDeclaration {
        qualifier,
        return_type,
        name: nickname.to_string(),
        params,
        trailing: style.option_bag.clone(),
    })
}

/// Render the declaration line for one classified operation.
pub fn render_signature(
    nickname: &str,
    classified: &ClassifiedArguments<'_>,
    mapper: &TypeMapper,
    style: &DeclarationStyle,
) -> Result<String> {
    Ok(codegen_declaration(nickname, classified, mapper, style)?.emit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::registry::{ArgumentFlags, ValueTypeKind};

    const IN: ArgumentFlags = ArgumentFlags::REQUIRED.union(ArgumentFlags::INPUT);
    const OUT: ArgumentFlags = ArgumentFlags::REQUIRED.union(ArgumentFlags::OUTPUT);

    fn arg(name: &str, value_type: &str, flags: ArgumentFlags, priority: i32) -> Argument {
        Argument {
            name: name.to_string(),
            value_type: value_type.to_string(),
            kind: ValueTypeKind::Primitive,
            flags,
            priority,
        }
    }

    fn render(nickname: &str, args: &[Argument]) -> Result<String> {
        let mapper = TypeMapper::default();
        let classified = classify(args, |t| mapper.is_image(t));
        render_signature(nickname, &classified, &mapper, &DeclarationStyle::default())
    }

    #[test]
    fn test_cppize() {
        assert_eq!(cppize("in"), "in");
        assert_eq!(cppize("max-alpha"), "max_alpha");
        assert_eq!(cppize("a-b-c"), "a_b_c");
    }

    #[test]
    fn test_receiver_only() {
        let args = vec![arg("in", "VipsImage", IN, 0)];
        assert_eq!(
            render("invert", &args).unwrap(),
            "void invert( VOption *options = 0 );"
        );
    }

    #[test]
    fn test_binary_operation() {
        let args = vec![
            arg("left", "VipsImage", IN, 0),
            arg("in2", "VipsImage", IN, 1),
            arg("out", "VipsImage", OUT, 2),
        ];
        assert_eq!(
            render("add", &args).unwrap(),
            "VImage add( VImage in2, VOption *options = 0 );"
        );
    }

    #[test]
    fn test_static_constructor() {
        let args = vec![
            arg("out", "VipsImage", OUT, 0),
            arg("width", "gint", IN, 1),
            arg("height", "gint", IN, 2),
        ];
        assert_eq!(
            render("black", &args).unwrap(),
            "static VImage black( int width, int height, VOption *options = 0 );"
        );
    }

    #[test]
    fn test_extra_outputs_are_pointers() {
        let args = vec![
            arg("in", "VipsImage", IN, 0),
            arg("out", "gdouble", OUT, 1),
            arg("x-pos", "gint", OUT, 2),
            arg("y-pos", "gint", OUT, 3),
        ];
        assert_eq!(
            render("max", &args).unwrap(),
            "double max( int *x_pos, int *y_pos, VOption *options = 0 );"
        );
    }

    #[test]
    fn test_enum_parameter() {
        let mut math = arg("math", "VipsOperationMath", IN, 1);
        math.kind = ValueTypeKind::Enum;
        let args = vec![
            arg("in", "VipsImage", IN, 0),
            math,
            arg("out", "VipsImage", OUT, 2),
        ];
        assert_eq!(
            render("math", &args).unwrap(),
            "VImage math( VipsOperationMath math, VOption *options = 0 );"
        );
    }

    #[test]
    fn test_unknown_parameter_type() {
        let args = vec![
            arg("in", "VipsImage", IN, 0),
            arg("interpolate", "VipsInterpolate", IN, 1),
        ];
        let err = render("affine", &args).unwrap_err();
        match err {
            GenerateError::UnknownType {
                nickname,
                property,
                value_type,
            } => {
                assert_eq!(nickname, "affine");
                assert_eq!(property, "interpolate");
                assert_eq!(value_type, "VipsInterpolate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_return_type() {
        let args = vec![arg("out", "GObject", OUT, 0)];
        assert!(matches!(
            render("thing", &args),
            Err(GenerateError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_custom_style() {
        let config = GeneratorConfig {
            static_marker: "static inline".to_string(),
            void_type: "VVoid".to_string(),
            option_bag: "VOption *opts = nullptr".to_string(),
            ..GeneratorConfig::default()
        };
        let mapper = TypeMapper::new(&config);
        let style = DeclarationStyle::new(&config);
        let args = vec![arg("filename", "gchararray", IN, 0)];
        let classified = classify(&args, |t| mapper.is_image(t));

        assert_eq!(
            render_signature("system", &classified, &mapper, &style).unwrap(),
            "static inline VVoid system( char *filename, VOption *opts = nullptr );"
        );
    }
}
