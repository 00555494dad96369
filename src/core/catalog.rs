//! Step catalog contract.
//!
//! A catalog is a closed, ordered set of steps. Each step knows how to
//! describe its callout and derives a stable [`StepId`] from the catalog's
//! type name and its own name.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Stable identifier for one step of one catalog.
///
/// Built from the fully-qualified catalog type name and the step name, so two
/// catalogs with identically named steps never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Combine a catalog type name and a step name.
    pub fn new(catalog: &str, step: &str) -> Self {
        Self(format!("{catalog}.{step}"))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Side of the anchor a callout is placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
}

/// Immutable description of the bubble shown next to an anchor.
///
/// `content` is an opaque payload handed to the renderer untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callout {
    /// Preferred edge relative to the anchor
    pub edge: Edge,
    /// Renderable payload
    pub content: String,
}

impl Callout {
    /// Create a callout on `edge` carrying `content`.
    pub fn new(edge: Edge, content: impl Into<String>) -> Self {
        Self {
            edge,
            content: content.into(),
        }
    }
}

/// Trait for step catalogs.
///
/// Implementors are closed enums. [`StepCatalog::all`] defines the tour's plan
/// order, so it must return the same sequence on every call.
///
/// # Example
///
/// ```rust
/// use coachmark::core::{Callout, Edge, StepCatalog};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Onboarding {
///     Search,
///     Profile,
/// }
///
/// impl StepCatalog for Onboarding {
///     fn all() -> Vec<Self> {
///         vec![Self::Search, Self::Profile]
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Search => "Search",
///             Self::Profile => "Profile",
///         }
///     }
///
///     fn make_callout(&self) -> Callout {
///         match self {
///             Self::Search => Callout::new(Edge::Bottom, "Find anything here"),
///             Self::Profile => Callout::new(Edge::Leading, "Your account lives here"),
///         }
///     }
/// }
///
/// assert_ne!(Onboarding::Search.key(), Onboarding::Profile.key());
/// assert!(Onboarding::Search.key().as_str().ends_with("Onboarding.Search"));
/// ```
pub trait StepCatalog: Clone + PartialEq + Debug + 'static {
    /// Every step, in plan order.
    fn all() -> Vec<Self>;

    /// The step's name, unique within the catalog.
    fn name(&self) -> &str;

    /// Describe the callout shown for this step.
    fn make_callout(&self) -> Callout;

    /// Identifier of this step, qualified by the catalog's type name.
    fn key(&self) -> StepId {
        StepId::new(std::any::type_name::<Self>(), self.name())
    }

    /// Identifiers of every step, in plan order.
    fn plan() -> Vec<StepId> {
        Self::all().iter().map(|step| step.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestSteps {
        Intro,
        Feature,
        Done,
    }

    impl StepCatalog for TestSteps {
        fn all() -> Vec<Self> {
            vec![Self::Intro, Self::Feature, Self::Done]
        }

        fn name(&self) -> &str {
            match self {
                Self::Intro => "Intro",
                Self::Feature => "Feature",
                Self::Done => "Done",
            }
        }

        fn make_callout(&self) -> Callout {
            match self {
                Self::Intro => Callout::new(Edge::Bottom, "Welcome"),
                Self::Feature => Callout::new(Edge::Top, "Try this"),
                Self::Done => Callout::new(Edge::Trailing, "All set"),
            }
        }
    }

    #[derive(Clone, PartialEq, Debug)]
    enum OtherSteps {
        Intro,
    }

    impl StepCatalog for OtherSteps {
        fn all() -> Vec<Self> {
            vec![Self::Intro]
        }

        fn name(&self) -> &str {
            "Intro"
        }

        fn make_callout(&self) -> Callout {
            Callout::new(Edge::Top, "Elsewhere")
        }
    }

    #[test]
    fn key_combines_type_and_step_name() {
        let key = TestSteps::Feature.key();
        assert!(key.as_str().ends_with("TestSteps.Feature"));
        assert!(key.as_str().contains("::"));
    }

    #[test]
    fn keys_are_unique_within_catalog() {
        let plan = TestSteps::plan();
        assert_eq!(plan.len(), 3);
        assert_ne!(plan[0], plan[1]);
        assert_ne!(plan[1], plan[2]);
        assert_ne!(plan[0], plan[2]);
    }

    #[test]
    fn same_step_name_differs_across_catalogs() {
        assert_ne!(TestSteps::Intro.key(), OtherSteps::Intro.key());
    }

    #[test]
    fn key_is_stable() {
        assert_eq!(TestSteps::Done.key(), TestSteps::Done.key());
    }

    #[test]
    fn plan_follows_enumeration_order() {
        let plan = TestSteps::plan();
        assert_eq!(plan[0], TestSteps::Intro.key());
        assert_eq!(plan[1], TestSteps::Feature.key());
        assert_eq!(plan[2], TestSteps::Done.key());
    }

    #[test]
    fn callout_carries_edge_and_content() {
        let callout = TestSteps::Intro.make_callout();
        assert_eq!(callout.edge, Edge::Bottom);
        assert_eq!(callout.content, "Welcome");
    }

    #[test]
    fn step_id_serializes_as_plain_string() {
        let id = StepId::new("app::Tour", "Intro");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"app::Tour.Intro\"");
        let back: StepId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn edge_serializes_lowercase() {
        let json = serde_json::to_string(&Edge::Leading).unwrap();
        assert_eq!(json, "\"leading\"");
    }
}
