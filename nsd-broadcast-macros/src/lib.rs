extern crate proc_macro;

use crate::proc_macro::TokenStream;
use quote::quote;
use syn::{self, DeriveInput, Ident};

/// Implements `BuilderDelegate` for the annotated type, wiring `T::builder()`
/// to the `derive_builder`-generated `TBuilder`.
#[proc_macro_derive(BuilderDelegate)]
pub fn builder_delegate_macro_derive(input: TokenStream) -> TokenStream {
    impl_builder_delegate(&syn::parse(input).expect("could not parse input"))
}

fn impl_builder_delegate(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;

    let builder: Ident =
        syn::parse_str(&format!("{}Builder", name)).expect("could not parse builder name");

    let generics = &ast.generics;

    let tokens = quote! {
        impl #generics crate::prelude::BuilderDelegate<#builder #generics> for #name #generics {}
    };

    tokens.into()
}
