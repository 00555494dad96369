//! Macro for declaring step catalogs.

/// Declare a step catalog enum and its [`StepCatalog`](crate::core::StepCatalog)
/// implementation.
///
/// Variants are enumerated in declaration order, which becomes the plan order.
/// Each variant names the [`Edge`](crate::core::Edge) its callout sits on and
/// the callout content.
///
/// # Example
///
/// ```
/// use coachmark::core::{Edge, StepCatalog};
/// use coachmark::step_catalog;
///
/// step_catalog! {
///     pub enum Onboarding {
///         Intro => Bottom("Welcome aboard"),
///         Search => Top("Search everything"),
///         Done => Trailing("You're all set"),
///     }
/// }
///
/// assert_eq!(Onboarding::all(), vec![Onboarding::Intro, Onboarding::Search, Onboarding::Done]);
/// assert_eq!(Onboarding::Search.name(), "Search");
/// assert_eq!(Onboarding::Done.make_callout().edge, Edge::Trailing);
/// ```
#[macro_export]
macro_rules! step_catalog {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $edge:ident($content:expr)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StepCatalog for $name {
            fn all() -> ::std::vec::Vec<Self> {
                ::std::vec![$(Self::$variant),*]
            }

            fn name(&self) -> &str {
                match *self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn make_callout(&self) -> $crate::core::Callout {
                match *self {
                    $(Self::$variant => $crate::core::Callout::new(
                        $crate::core::Edge::$edge,
                        $content,
                    )),*
                }
            }
        }
    };
}
