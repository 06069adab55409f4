use strata_tree::{ConfigTree, Value};

/// One parameter of a [`Signature`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    default: Option<Value>,
}

impl Parameter {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The parameter list of a plain function, as far as default extraction is concerned.
///
/// Usually written with [`signature!`](crate::signature):
///
/// ```rust
/// use strata_kernel::signature;
///
/// let sig = signature!(raymarch(x, y = 5));
/// assert_eq!(sig.defaults().get("y").and_then(|v| v.as_i64()), Some(5));
/// assert!(!sig.defaults().contains_key("x"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    parameters: Vec<Parameter>,
}

impl Signature {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), parameters: Vec::new() }
    }

    /// A parameter without a default.
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter { name: name.into(), default: None });
        self
    }

    #[must_use]
    pub fn arg_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.parameters.push(Parameter { name: name.into(), default: Some(default.into()) });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// A fresh tree holding a copy of every defaulted parameter, in declaration order.
    #[must_use]
    pub fn defaults(&self) -> ConfigTree {
        self.parameters
            .iter()
            .filter_map(|param| param.default.clone().map(|default| (param.name.clone(), default)))
            .collect()
    }
}

/// Declares a [`Signature`] with function-like syntax: `signature!(f(x, y = 5))`.
#[macro_export]
macro_rules! signature {
    ($name:ident ( $($params:tt)* )) => {
        $crate::signature!(@params $crate::callable::Signature::new(stringify!($name)); $($params)*)
    };
    (@params $sig:expr;) => {
        $sig
    };
    (@params $sig:expr; $param:ident = $default:expr $(, $($rest:tt)*)?) => {
        $crate::signature!(@params $sig.arg_with_default(stringify!($param), $default); $($($rest)*)?)
    };
    (@params $sig:expr; $param:ident $(, $($rest:tt)*)?) => {
        $crate::signature!(@params $sig.arg(stringify!($param)); $($($rest)*)?)
    };
}

#[cfg(test)]
mod tests {
    use strata_tree::config_tree;

    #[test]
    fn only_defaulted_parameters_are_extracted() {
        let sig = signature!(f(x, y = 5));
        assert_eq!(sig.parameters().len(), 2);
        assert_eq!(sig.defaults(), config_tree! { "y" => 5 });
    }

    #[test]
    fn defaults_keep_declaration_order() {
        let sig = signature!(RayNormalColoringNetwork(
            feature_vector_size = 3,
            mode = "idr",
            d_in = 9,
            dims = vec![512, 512],
            weight_norm = true,
        ));
        let keys: Vec<_> = sig.defaults().keys().map(str::to_owned).collect();
        assert_eq!(keys, ["feature_vector_size", "mode", "d_in", "dims", "weight_norm"]);
        assert_eq!(sig.name(), "RayNormalColoringNetwork");
    }

    #[test]
    fn each_extraction_is_a_copy() {
        let sig = signature!(g(scale = 1.5));
        let mut first = sig.defaults();
        first.insert("scale", 2.0);
        assert_eq!(sig.defaults().get("scale").and_then(|v| v.as_f64()), Some(1.5));
    }

    #[test]
    fn empty_parameter_list() {
        assert!(signature!(noop()).defaults().is_empty());
    }
}
