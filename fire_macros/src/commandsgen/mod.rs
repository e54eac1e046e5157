//! # Method Set Macro
//!
//! `#[commands]` is placed on an inherent `impl` block. The block is emitted
//! unchanged, followed by an `Introspectable` implementation that lists and
//! calls the methods the dispatcher can reach.
//!
//! ## Exposed Methods
//!
//! +-----------------------------+----------+
//! | Method form                 | Exposed  |
//! +-----------------------------+----------+
//! | `pub fn f(&self, ..)`       | yes      |
//! | `pub fn f(self: &Self, ..)` | yes      |
//! | `pub fn f(&mut self, ..)`   | no       |
//! | `pub fn f(self, ..)`        | no       |
//! | `pub fn f(..)` (no self)    | no       |
//! | `fn f(&self, ..)` private   | no       |
//! | `pub async fn` / generic    | no       |
//! +-----------------------------+----------+
//!
//! Parameter types must implement `fire_core::Param`, the return type
//! `fire_core::Returns`. Violations are reported by rustc at the method.
//!
//! ## Documentation
//! The `///` lines of a method become its help text, joined by spaces.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, Attribute, Expr, ExprLit, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Lit,
    LitStr, Meta, ReturnType, Result, Type, Visibility,
};

/// One exposed method.
struct MethodEntry {
    name_str: String,
    ident: Ident,
    params: Vec<Type>,
    ret: TokenStream2,
    doc: Option<String>,
}

pub fn commands_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let err = syn::Error::new(Span::call_site(), "#[commands] does not take arguments");
        return err.to_compile_error().into();
    }
    let item_impl = parse_macro_input!(item as ItemImpl);
    match expand(item_impl) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(item_impl: ItemImpl) -> Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[commands] expects an inherent impl block, not a trait impl",
        ));
    }

    let entries: Vec<MethodEntry> = item_impl
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => method_entry(method),
            _ => None,
        })
        .collect();

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    let signatures: Vec<TokenStream2> = entries.iter().map(signature_tokens).collect();
    let match_arms: Vec<TokenStream2> = entries.iter().map(call_arm).collect();

    Ok(quote! {
        #item_impl

        impl #impl_generics ::fire_core::Introspectable for #self_ty #where_clause {
            fn shape(&self) -> ::fire_core::Shape {
                ::fire_core::Shape::Aggregate
            }

            fn signatures(&self) -> ::std::vec::Vec<::fire_core::Signature> {
                ::std::vec![ #( #signatures ),* ]
            }

            fn call(
                &self,
                name: &str,
                args: &[::fire_core::Value],
            ) -> ::core::result::Result<::std::vec::Vec<::fire_core::Value>, ::fire_core::FireError> {
                match name {
                    #( #match_arms )*
                    _ => ::core::result::Result::Err(::fire_core::FireError::unknown_command(name)),
                }
            }
        }
    })
}

/// `Some` when `method` is reachable from the command line.
fn method_entry(method: &ImplItemFn) -> Option<MethodEntry> {
    let sig = &method.sig;
    if !matches!(method.vis, Visibility::Public(_))
        || sig.asyncness.is_some()
        || sig.unsafety.is_some()
        || sig.variadic.is_some()
        || !sig.generics.params.is_empty()
    {
        return None;
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        // `&self` and `self: &Self` both carry a shared reference type
        Some(FnArg::Receiver(recv)) if matches!(&*recv.ty, Type::Reference(r) if r.mutability.is_none()) => {}
        _ => return None,
    }

    let mut params = Vec::new();
    for input in inputs {
        match input {
            FnArg::Typed(pat_type) => params.push((*pat_type.ty).clone()),
            FnArg::Receiver(_) => return None,
        }
    }

    let ret = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    Some(MethodEntry {
        name_str: sig.ident.unraw().to_string(),
        ident: sig.ident.clone(),
        params,
        ret,
        doc: doc_text(&method.attrs),
    })
}

/// `///` lines of an item joined by single spaces.
fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    (!lines.is_empty()).then(|| lines.join(" "))
}

fn signature_tokens(e: &MethodEntry) -> TokenStream2 {
    let name_lit = LitStr::new(&e.name_str, Span::call_site());
    let params = &e.params;
    let ret = &e.ret;
    let doc = match &e.doc {
        Some(text) => {
            let lit = LitStr::new(text, Span::call_site());
            quote! { ::core::option::Option::Some(::std::string::String::from(#lit)) }
        }
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        ::fire_core::Signature {
            name: ::std::string::String::from(#name_lit),
            params: ::std::vec![ #( <#params as ::fire_core::Param<'_>>::TAG ),* ],
            returns: <#ret as ::fire_core::Returns>::tags(),
            doc: #doc,
        }
    }
}

fn call_arm(e: &MethodEntry) -> TokenStream2 {
    let name_lit = LitStr::new(&e.name_str, Span::call_site());
    let ident = &e.ident;
    let arg_idents: Vec<Ident> = (0..e.params.len()).map(|i| format_ident!("__arg{}", i)).collect();
    let extracts = e.params.iter().zip(&arg_idents).enumerate().map(|(index, (ty, arg))| {
        quote! {
            let #arg: #ty = ::fire_core::argument(#name_lit, args, #index)?;
        }
    });

    quote! {
        #name_lit => {
            #( #extracts )*
            ::core::result::Result::Ok(::fire_core::Returns::into_values(self.#ident( #( #arg_idents ),* )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(src: &str) -> Vec<MethodEntry> {
        let item: ItemImpl = syn::parse_str(src).unwrap();
        item.items
            .iter()
            .filter_map(|item| match item {
                ImplItem::Fn(method) => method_entry(method),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_only_public_shared_ref_methods_are_exposed() {
        let found = entries(
            r#"
            impl Sample {
                pub fn add(&self, a: i64, b: i64) -> i64 { a + b }
                pub fn reset(&mut self) {}
                pub fn consume(self) {}
                pub fn new() -> Self { Sample }
                fn private(&self) {}
                pub async fn later(&self) {}
                pub fn generic<T>(&self, t: T) {}
                pub fn r#type(&self) -> &str { "t" }
                pub fn typed(self: &Self, n: u8) -> u8 { n }
                pub fn typed_mut(self: &mut Self) {}
                pub fn boxed(self: Box<Self>) {}
            }
            "#,
        );
        let names: Vec<&str> = found.iter().map(|e| e.name_str.as_str()).collect();
        assert_eq!(names, vec!["add", "type", "typed"]);
        assert_eq!(found[2].params.len(), 1);
        assert_eq!(found[0].params.len(), 2);
    }

    #[test]
    fn test_docs_are_joined() {
        let found = entries(
            r#"
            impl Sample {
                /// Add is a method for Add.
                ///
                /// Returns the sum.
                pub fn add(&self, a: i64, b: i64) -> i64 { a + b }
                pub fn minus(&self, a: i64, b: i64) -> i64 { a - b }
            }
            "#,
        );
        assert_eq!(found[0].doc.as_deref(), Some("Add is a method for Add. Returns the sum."));
        assert_eq!(found[1].doc, None);
    }

    #[test]
    fn test_trait_impl_is_rejected() {
        let item: ItemImpl = syn::parse_str("impl Clone for Sample { fn clone(&self) -> Self { Sample } }").unwrap();
        let err = expand(item).err().unwrap();
        assert!(err.to_string().contains("inherent impl"));
    }

    #[test]
    fn test_expansion_contains_call_arms() {
        let item: ItemImpl =
            syn::parse_str("impl Sample { pub fn string(&self, s: &str) -> String { s.to_uppercase() } }").unwrap();
        let out = expand(item).unwrap().to_string();
        assert!(out.contains("Introspectable for Sample"));
        assert!(out.contains("\"string\" =>"));
        assert!(out.contains("__arg0"));
    }
}
