//! `hierarchy!`: write a path list as a tree literal.
//!
//! ```ignore
//! hierarchy_view::hierarchy! {
//!     pub mod Scene {
//!         root {
//!             body {
//!                 left_arm { finger1; finger2; }
//!             }
//!             legs { left_foot; "right foot"; }
//!         }
//!     }
//! }
//!
//! // Generates:
//! pub mod Scene {
//!     pub const SEPARATOR: char = '/';
//!     pub const PATHS: &[&str] = &[
//!         "/root/body/left_arm/finger1",
//!         "/root/body/left_arm/finger2",
//!         "/root/legs/left_foot",
//!         "/root/legs/right foot",
//!     ];
//!     pub const NODE_COUNT: usize = 8;
//!     pub const LEAF_COUNT: usize = 4;
//!     pub const TREE_DEPTH: usize = 4;
//!     pub fn store(default_state: bool) -> HierarchyStateStore { ... }
//! }
//! ```
//!
//! A `#[separator = '|']` attribute before `mod` switches the separator.

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, token, Error, Ident, LitChar, LitStr, Result, Token, Visibility};

use proc_macro_crate::{crate_name, FoundCrate};

const DEFAULT_SEPARATOR: char = '/';

struct Node {
    name: String,
    span: Span,
    children: Vec<Node>,
}

struct HierarchyInput {
    separator: char,
    vis: Visibility,
    root: Ident,
    nodes: Vec<Node>,
}

impl Parse for HierarchyInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let separator = parse_separator_attr(input)?.unwrap_or(DEFAULT_SEPARATOR);
        let vis: Visibility = input.parse()?;
        input.parse::<Token![mod]>()?;
        let root: Ident = input.parse()?;
        let content;
        braced!(content in input);
        let nodes = parse_nodes(&content)?;
        Ok(Self {
            separator,
            vis,
            root,
            nodes,
        })
    }
}

/// Parse `#[separator = 'c']`.
fn parse_separator_attr(input: ParseStream) -> Result<Option<char>> {
    let mut separator = None;

    while input.peek(Token![#]) {
        input.parse::<Token![#]>()?;
        let content;
        syn::bracketed!(content in input);

        let key: Ident = content.parse()?;
        if key != "separator" {
            return Err(Error::new(
                key.span(),
                format!("unknown attribute '{}', expected 'separator'", key),
            ));
        }
        content.parse::<Token![=]>()?;
        let lit: LitChar = content.parse()?;
        separator = Some(lit.value());
    }

    Ok(separator)
}

fn parse_nodes(input: ParseStream) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    while !input.is_empty() {
        // Segment: identifier or string literal
        let (name, span) = if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            (lit.value(), lit.span())
        } else {
            let ident = input.call(Ident::parse_any)?;
            (ident.unraw().to_string(), ident.span())
        };

        // Children or semicolon
        let children = if input.peek(token::Brace) {
            let content;
            braced!(content in input);
            parse_nodes(&content)?
        } else {
            input.parse::<Token![;]>()?;
            Vec::new()
        };

        nodes.push(Node {
            name,
            span,
            children,
        });
    }
    Ok(nodes)
}

// =============================================================================
// Tree analysis (runs at macro expansion time)
// =============================================================================

/// Reject empty names, names containing the separator, and sibling
/// duplicates (they would collapse into one node at runtime).
fn validate_nodes(nodes: &[Node], separator: char) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if node.name.is_empty() {
            return Err(Error::new(node.span, "empty segment name"));
        }
        if node.name.contains(separator) {
            return Err(Error::new(
                node.span,
                format!(
                    "segment '{}' contains the separator '{}'",
                    node.name, separator
                ),
            ));
        }
        if !seen.insert(node.name.as_str()) {
            return Err(Error::new(
                node.span,
                format!("duplicate segment '{}' under the same parent", node.name),
            ));
        }
        validate_nodes(&node.children, separator)?;
    }
    Ok(())
}

/// One path per leaf, in source order.
fn collect_leaf_paths(nodes: &[Node], prefix: &str, separator: char, out: &mut Vec<String>) {
    for node in nodes {
        let path = format!("{}{}{}", prefix, separator, node.name);
        if node.children.is_empty() {
            out.push(path);
        } else {
            collect_leaf_paths(&node.children, &path, separator, out);
        }
    }
}

fn count_nodes(nodes: &[Node]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

fn tree_depth(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + tree_depth(&n.children))
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn hierarchy_crate_path() -> TokenStream2 {
    match crate_name("hierarchy-view") {
        Ok(FoundCrate::Itself) => {
            quote!(::hierarchy_view)
        }
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::hierarchy_view),
    }
}

// =============================================================================
// Entry point
// =============================================================================

#[proc_macro]
pub fn hierarchy(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as HierarchyInput);

    if let Err(err) = validate_nodes(&input.nodes, input.separator) {
        return err.to_compile_error().into();
    }

    let hv_crate = hierarchy_crate_path();

    let mut paths = Vec::new();
    collect_leaf_paths(&input.nodes, "", input.separator, &mut paths);

    let node_count = count_nodes(&input.nodes);
    let leaf_count = paths.len();
    let depth = tree_depth(&input.nodes);
    let separator = LitChar::new(input.separator, Span::call_site());
    let vis = input.vis;
    let root = input.root;

    let expanded = quote! {
        #[allow(non_snake_case)]
        #vis mod #root {
            /// Separator joining the segments of every path.
            pub const SEPARATOR: char = #separator;

            /// One path per leaf, in declaration order.
            pub const PATHS: &[&str] = &[#(#paths),*];

            /// Number of unique nodes the paths flatten into.
            pub const NODE_COUNT: usize = #node_count;

            /// Number of leaves (equal to `PATHS.len()`).
            pub const LEAF_COUNT: usize = #leaf_count;

            /// Number of tree levels.
            pub const TREE_DEPTH: usize = #depth;

            /// A store populated with [`PATHS`].
            pub fn store(default_state: bool) -> #hv_crate::HierarchyStateStore {
                let mut store = #hv_crate::HierarchyStateStore::new();
                store.reset(PATHS.iter().copied(), Some(SEPARATOR), None, default_state);
                store
            }
        }
    };

    expanded.into()
}
