use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident};

/// Derive macro that generates per-field windowed interpolation for a flat record
///
/// Every named field is interpolated with `Animatable::lerp`. By default the
/// progress value is used as-is; a `#[window(..)]` attribute remaps it first.
///
/// # Attributes on fields
/// - `#[window(linear)]` - Plain progress (same as no attribute)
/// - `#[window(late_start)]` - Frozen for the first half, then catches up
/// - `#[window(early_finish)]` - Completes within the first half
/// - `#[window(tail)]` - Frozen until 0.7, then catches up
///
/// Besides the `Interpolate` impl, the derive adds `FIELD_NAMES`,
/// `fields_in(window)`, `get(name)` and `set(name, value)` to the type.
/// The by-name accessors require every field to be `f32`.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Copy, Interpolate)]
/// pub struct Frame {
///     pub y: f32,
///     #[window(tail)]
///     pub alpha: f32,
/// }
/// ```
#[proc_macro_derive(Interpolate, attributes(window))]
pub fn derive_interpolate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

struct WindowedField {
    name: Ident,
    window: Ident,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Interpolate can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Interpolate can only be derived for structs",
            ))
        }
    };

    let mut windowed = Vec::new();
    for field in fields {
        let Some(name) = field.ident.clone() else {
            continue;
        };

        let mut window = format_ident!("Linear");
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("window")) {
            let arg: Ident = attr.parse_args()?;
            window = match arg.to_string().as_str() {
                "linear" => format_ident!("Linear"),
                "late_start" => format_ident!("LateStart"),
                "early_finish" => format_ident!("EarlyFinish"),
                "tail" => format_ident!("Tail"),
                other => {
                    return Err(syn::Error::new_spanned(
                        &arg,
                        format!(
                            "unknown window `{}`; expected linear, late_start, early_finish or tail",
                            other
                        ),
                    ))
                }
            };
        }

        windowed.push(WindowedField { name, window });
    }

    let lerps = windowed.iter().map(|field| {
        let name = &field.name;
        let window = &field.window;
        quote! {
            #name: ::shade_header::animation::Animatable::lerp(
                &from.#name,
                &to.#name,
                ::shade_header::animation::Window::#window.remap(t),
            )
        }
    });

    let names: Vec<String> = windowed.iter().map(|f| f.name.to_string()).collect();

    let window_arms = ["Linear", "LateStart", "EarlyFinish", "Tail"].map(|variant| {
        let variant_ident = format_ident!("{}", variant);
        let members: Vec<String> = windowed
            .iter()
            .filter(|f| f.window == variant)
            .map(|f| f.name.to_string())
            .collect();
        quote! {
            ::shade_header::animation::Window::#variant_ident => &[#(#members),*]
        }
    });

    let getters = windowed.iter().map(|field| {
        let name = &field.name;
        let key = name.to_string();
        quote! { #key => Some(self.#name) }
    });

    let setters = windowed.iter().map(|field| {
        let name = &field.name;
        let key = name.to_string();
        quote! {
            #key => {
                self.#name = value;
                true
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::shade_header::animation::Interpolate for #struct_name #ty_generics #where_clause {
            fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
                Self {
                    #(#lerps,)*
                }
            }
        }

        impl #impl_generics #struct_name #ty_generics #where_clause {
            /// Names of every interpolated field, in declaration order
            pub const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];

            /// Names of the fields driven by the given timing window
            pub fn fields_in(window: ::shade_header::animation::Window) -> &'static [&'static str] {
                match window {
                    #(#window_arms,)*
                }
            }

            /// Read a field by name
            pub fn get(&self, name: &str) -> Option<f32> {
                match name {
                    #(#getters,)*
                    _ => None,
                }
            }

            /// Write a field by name, returning false for unknown names
            pub fn set(&mut self, name: &str, value: f32) -> bool {
                match name {
                    #(#setters)*
                    _ => false,
                }
            }
        }
    })
}
