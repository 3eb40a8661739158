//! Namespace resolution
//!
//! Stack-based namespace resolver: bindings are pushed as elements open
//! and dropped when their declaring element closes.

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &[u8] = b"http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &[u8] = b"http://www.w3.org/2000/xmlns/";
}

/// Namespace binding (prefix -> URI)
///
/// An empty prefix is the default namespace; an empty URI undeclares it.
#[derive(Debug, Clone)]
struct NsBinding {
    prefix: Vec<u8>,
    uri: Vec<u8>,
    depth: u16,
}

/// Stack-based namespace resolver
#[derive(Debug)]
pub struct NamespaceResolver {
    bindings: Vec<NsBinding>,
    depth: u16,
}

impl NamespaceResolver {
    /// Create a new resolver with the xml and xmlns prefixes pre-bound
    pub fn new() -> Self {
        NamespaceResolver {
            bindings: vec![
                NsBinding {
                    prefix: b"xml".to_vec(),
                    uri: ns::XML.to_vec(),
                    depth: 0,
                },
                NsBinding {
                    prefix: b"xmlns".to_vec(),
                    uri: ns::XMLNS.to_vec(),
                    depth: 0,
                },
            ],
            depth: 0,
        }
    }

    /// Enter a new element scope
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it
    pub fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a namespace binding for the current scope
    ///
    /// Pass an empty prefix for the default namespace. Redeclaring xml or
    /// xmlns is ignored.
    pub fn declare(&mut self, prefix: &[u8], uri: &[u8]) {
        if prefix == b"xml" || prefix == b"xmlns" {
            return;
        }
        self.bindings.push(NsBinding {
            prefix: prefix.to_vec(),
            uri: uri.to_vec(),
            depth: self.depth,
        });
    }

    /// Resolve a prefix to a namespace URI
    ///
    /// Returns None for unbound prefixes and for an undeclared default
    /// namespace (empty URI binding).
    pub fn resolve(&self, prefix: &[u8]) -> Option<&[u8]> {
        for binding in self.bindings.iter().rev() {
            if binding.prefix == prefix {
                if binding.uri.is_empty() {
                    return None;
                }
                return Some(&binding.uri);
            }
        }
        None
    }

    /// Resolve the default namespace
    #[inline]
    pub fn resolve_default(&self) -> Option<&[u8]> {
        self.resolve(b"")
    }
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new()
    }
}
