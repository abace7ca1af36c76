use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Fields, Ident, LitStr};

/// Struct-level `#[entity(...)]` options.
struct EntityOptions {
    table: String,
    navigations: bool,
}

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let options = extract_options(input)?;
    let id_field = extract_id_field(input)?;
    let table = options.table;

    // Generic entities only implement the trait where the instantiated type
    // meets its supertraits, e.g. `Tagged<M>` needs `M: Serialize`.
    let (_, ty_generics, _) = input.generics.split_for_impl();
    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        generics.make_where_clause().predicates.push(parse_quote! {
            #name #ty_generics: slim_repository::__private::Serialize
                + slim_repository::__private::DeserializeOwned
                + ::core::clone::Clone
                + ::core::marker::Send
                + ::core::marker::Sync
                + 'static
        });
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    // Only entities that opt in get a navigation hook; everything else keeps
    // the trait default, which rejects every include path.
    let navigation_hook = if options.navigations {
        quote! {
            const NAVIGATIONS: &'static [&'static str] =
                <Self as slim_repository::Navigations>::NAVIGATIONS;

            fn load_navigation<L: slim_repository::NavigationLoader>(
                &mut self,
                navigation: &str,
                rest: Option<&str>,
                loader: &L,
            ) -> Result<(), slim_repository::RepositoryError> {
                <Self as slim_repository::Navigations>::navigate(self, navigation, rest, loader)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics slim_repository::Entity for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;

            fn id(&self) -> i64 {
                self.#id_field
            }

            fn set_id(&mut self, id: i64) {
                self.#id_field = id;
            }

            #navigation_hook
        }
    })
}

fn extract_options(input: &DeriveInput) -> syn::Result<EntityOptions> {
    let mut table = None;
    let mut navigations = false;

    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                table = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("navigations") {
                navigations = true;
                Ok(())
            } else {
                Err(meta.error("expected `table = \"...\"` or `navigations`"))
            }
        })?;
    }

    // Default: snake_case struct name + "s"
    let table = table.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));

    Ok(EntityOptions { table, navigations })
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<Ident> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => fields,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Entity derive requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Entity derive only supports structs",
            ))
        }
    };

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;
            if is_id {
                if let Some(ident) = &field.ident {
                    return Ok(ident.clone());
                }
            }
        }
    }

    // Default: look for a field named "id"
    fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == "id")
        .cloned()
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Entity derive: no field marked with #[entity(id)] and no field named `id`",
            )
        })
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
