use dhcp_wire::IdentityAssociation;
use std::fmt;

/// Aggregate satisfaction of a set of requested IAs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// Every requested IA was granted a resource.
    All,
    /// Some, but not all, requested IAs were granted a resource.
    Some,
    /// No requested IA was granted a resource.
    None,
}

impl Quantifier {
    /// Metric label for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Some => "some",
            Self::None => "none",
        }
    }

    const fn from_counts(satisfied: usize, unsatisfied: usize) -> Self {
        if satisfied == 0 {
            Self::None
        } else if unsatisfied == 0 {
            Self::All
        } else {
            Self::Some
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of matching one IA kind of a request against its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Aggregate satisfaction.
    pub quantifier: Quantifier,
    /// Denials for requested IAs the response left out, in request order.
    pub denials: Vec<IdentityAssociation>,
}

impl Reconciliation {
    /// Number of denial IAs the caller must append to the response.
    #[must_use]
    pub fn synthetic_count(&self) -> usize {
        self.denials.len()
    }
}

/// Matches `requested` IAs against `granted` IAs by IAID.
///
/// Both slices hold IAs of a single kind. A request IA whose IAID appears
/// in `granted` is satisfied if the first such IA carries a resource. One
/// whose IAID is missing from `granted` is unsatisfied and gets a denial,
/// at most one per IAID.
///
/// # Examples
///
/// ```
/// use dhcp_wire::{IaKind, IdentityAssociation};
/// use dhcpstats::reconcile::{reconcile, Quantifier};
///
/// let asked = IdentityAssociation::new(IaKind::Na, [0, 0, 0, 1]);
/// let outcome = reconcile(&[&asked], &[]);
/// assert_eq!(outcome.quantifier, Quantifier::None);
/// assert_eq!(outcome.denials[0].iaid, [0, 0, 0, 1]);
/// ```
#[must_use]
pub fn reconcile(
    requested: &[&IdentityAssociation],
    granted: &[&IdentityAssociation],
) -> Reconciliation {
    let mut satisfied = 0usize;
    let mut unsatisfied = 0usize;
    let mut denials: Vec<IdentityAssociation> = Vec::new();

    for req in requested {
        match granted.iter().find(|g| g.iaid == req.iaid) {
            Some(g) if g.is_allocated() => satisfied += 1,
            Some(_) => unsatisfied += 1,
            None => {
                unsatisfied += 1;
                if !denials.iter().any(|d| d.iaid == req.iaid) {
                    denials.push(IdentityAssociation::denial(req.kind, req.iaid));
                }
            }
        }
    }

    Reconciliation {
        quantifier: Quantifier::from_counts(satisfied, unsatisfied),
        denials,
    }
}
