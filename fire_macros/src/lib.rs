extern crate proc_macro;

mod commandsgen;

use proc_macro::TokenStream;
use commandsgen::commands_impl;

/// Expose the public `&self` methods of an inherent impl block as fire
/// commands by implementing `fire_core::Introspectable` for its type.
#[proc_macro_attribute]
pub fn commands(attr: TokenStream, item: TokenStream) -> TokenStream {
    commands_impl(attr, item)
}
