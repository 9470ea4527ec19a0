//! Route-guard decision helper consuming the credential source.
//!
//! The guard is a consumer of the token store, not of the request core: the
//! surrounding application reads the current credential and asks for a
//! decision before entering a view.

/// Classification of the view a navigation is about to enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteTarget {
	/// View that requires an authenticated session.
	Protected,
	/// The login view itself.
	Login,
	/// View reachable with or without a credential.
	Public,
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
	/// Enter the requested view.
	Proceed,
	/// Credential missing for a protected view.
	RedirectToLogin,
	/// Already authenticated; the login view is pointless.
	RedirectToHome,
}

/// Decides how a navigation should proceed given whether a credential is
/// currently present.
pub const fn route_decision(target: RouteTarget, authenticated: bool) -> RouteDecision {
	match (target, authenticated) {
		(RouteTarget::Protected, false) => RouteDecision::RedirectToLogin,
		(RouteTarget::Login, true) => RouteDecision::RedirectToHome,
		_ => RouteDecision::Proceed,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn guard_matches_the_route_table() {
		assert_eq!(
			route_decision(RouteTarget::Protected, false),
			RouteDecision::RedirectToLogin
		);
		assert_eq!(route_decision(RouteTarget::Protected, true), RouteDecision::Proceed);
		assert_eq!(route_decision(RouteTarget::Login, true), RouteDecision::RedirectToHome);
		assert_eq!(route_decision(RouteTarget::Login, false), RouteDecision::Proceed);
		assert_eq!(route_decision(RouteTarget::Public, false), RouteDecision::Proceed);
		assert_eq!(route_decision(RouteTarget::Public, true), RouteDecision::Proceed);
	}
}
