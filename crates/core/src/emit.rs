//! C++ declaration IR and its emission via the `Emit` trait.
//!
//! Everything here is already resolved: type names are final strings and
//! markers have been chosen. Emission is purely mechanical string building.

/// Trait for emitting C++ code from IR nodes.
pub trait Emit {
    /// Convert the IR node to its C++ string representation.
    fn emit(&self) -> String;
}

/// One explicit parameter of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppParam {
    /// Resolved C++ type, e.g. `double` or `char *`.
    pub ty: String,
    /// Output parameters are passed by pointer.
    pub by_pointer: bool,
    /// Parameter name, already a valid C++ identifier.
    pub name: String,
}

/// A member function declaration of the image class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppDeclaration {
    /// Qualifier such as `static`, set when there is no receiver.
    pub qualifier: Option<String>,
    /// Resolved return type.
    pub return_type: String,
    /// Function name.
    pub name: String,
    /// Explicit parameters, in order.
    pub params: Vec<CppParam>,
    /// Always-present trailing parameter, e.g. `VOption *options = 0`.
    pub trailing: String,
}

/// Join a type and a declarator so that `char *` binds as `char *name`.
fn declarator(ty: &str, name: &str) -> String {
    if ty.ends_with('*') {
        format!("{ty}{name}")
    } else {
        format!("{ty} {name}")
    }
}

impl Emit for CppParam {
    fn emit(&self) -> String {
        if self.by_pointer {
            declarator(&self.ty, &format!("*{}", self.name))
        } else {
            declarator(&self.ty, &self.name)
        }
    }
}

impl Emit for CppDeclaration {
    fn emit(&self) -> String {
        let mut args: Vec<String> = self.params.iter().map(|p| p.emit()).collect();
        args.push(self.trailing.clone());

        let head = declarator(&self.return_type, &self.name);
        match &self.qualifier {
            Some(qualifier) => format!("{qualifier} {head}( {} );", args.join(", ")),
            None => format!("{head}( {} );", args.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(ty: &str, name: &str, by_pointer: bool) -> CppParam {
        CppParam {
            ty: ty.to_string(),
            by_pointer,
            name: name.to_string(),
        }
    }

    fn declaration(qualifier: Option<&str>, ret: &str, params: Vec<CppParam>) -> CppDeclaration {
        CppDeclaration {
            qualifier: qualifier.map(str::to_string),
            return_type: ret.to_string(),
            name: "op".to_string(),
            params,
            trailing: "VOption *options = 0".to_string(),
        }
    }

    #[test]
    fn test_emit_param() {
        assert_eq!(param("double", "scale", false).emit(), "double scale");
        assert_eq!(param("double", "out", true).emit(), "double *out");
        assert_eq!(param("char *", "filename", false).emit(), "char *filename");
        assert_eq!(param("char *", "out", true).emit(), "char **out");
        assert_eq!(
            param("std::vector<double>", "c", false).emit(),
            "std::vector<double> c"
        );
    }

    #[test]
    fn test_emit_empty_declaration() {
        assert_eq!(
            declaration(None, "void", vec![]).emit(),
            "void op( VOption *options = 0 );"
        );
    }

    #[test]
    fn test_emit_static_with_params() {
        let decl = declaration(
            Some("static"),
            "VImage",
            vec![param("int", "width", false), param("int", "height", false)],
        );
        assert_eq!(
            decl.emit(),
            "static VImage op( int width, int height, VOption *options = 0 );"
        );
    }

    #[test]
    fn test_emit_pointer_return_type() {
        let decl = declaration(None, "VipsBlob *", vec![]);
        assert_eq!(decl.emit(), "VipsBlob *op( VOption *options = 0 );");
    }
}
