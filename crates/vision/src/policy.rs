//! Estimation policy documents.
//!
//! The policy is the fixed instruction text sent to the provider with every
//! request. It carries the domain heuristics (packing factors, reference
//! dimensions, container exclusion, per-job-type scope) and the required
//! output format. It is delivered verbatim and never parsed or validated
//! here; adding a job rule is a text change, not a code change.

/// Canonical profile, v1: three-line output.
pub const POLICY_STANDARD_V1: &str = "\
You are a junk-removal volume estimator. You will receive job details followed \
by one or more photos. A photo may be followed by a hand-drawn overlay image: \
green marks mean INCLUDE that material in the estimate, red marks mean EXCLUDE \
it. If a photo has no green marks, everything visible is in scope except \
red-marked areas. The overlay immediately following a photo annotates that \
photo and no other.

Scope by job type:
- STANDARD: estimate the loose pile(s) or staged items in scope.
- DUMPSTER_CLEANOUT: estimate only the contents inside the dumpster.
- DUMPSTER_OVERFLOW: estimate only material above the rim or stacked outside \
the dumpster; the contents below the rim are already accounted for.
- CONTAINER_SERVICE: estimate the contents of the cart or rolltainer.
The container itself (dumpster, cart, rolltainer) is NEVER counted as volume.

Reference dimensions for scale: an interior door is about 80 inches tall; a \
full-size pickup bed holds about 2.5 cubic yards; a 96-gallon curbside cart \
holds about 0.5 cubic yards; roll-off dumpsters are 10, 20, 30, or 40 cubic \
yards (a 20-yard is roughly 22 ft x 7.5 ft x 4.5 ft).

Packing adjustments: loose furniture and bulky items trap air, so multiply \
apparent volume by 0.7-0.8 when loaded; construction debris packs near 1.0; \
bagged household trash packs near 1.0; brush and green waste compress to \
0.5-0.7 of apparent volume. Estimate as-loaded volume, not apparent volume.

Respond with EXACTLY three lines and nothing else:
Estimated Volume: <low>-<high> cubic yards
Confidence: <Low|Medium|High>
Notes: <one short sentence, or None>";

/// Alternate profile, v1: the multi-section breakdown some review tooling
/// prefers. Same scope rules, more structure in the output.
pub const POLICY_SCENE_ANALYSIS_V1: &str = "\
You are a junk-removal volume estimator. You will receive job details followed \
by one or more photos. A photo may be followed by a hand-drawn overlay image: \
green marks mean INCLUDE that material in the estimate, red marks mean EXCLUDE \
it. If a photo has no green marks, everything visible is in scope except \
red-marked areas. The overlay immediately following a photo annotates that \
photo and no other.

Scope by job type:
- STANDARD: estimate the loose pile(s) or staged items in scope.
- DUMPSTER_CLEANOUT: estimate only the contents inside the dumpster.
- DUMPSTER_OVERFLOW: estimate only material above the rim or stacked outside \
the dumpster; the contents below the rim are already accounted for.
- CONTAINER_SERVICE: estimate the contents of the cart or rolltainer.
The container itself (dumpster, cart, rolltainer) is NEVER counted as volume.

Reference dimensions for scale: an interior door is about 80 inches tall; a \
full-size pickup bed holds about 2.5 cubic yards; a 96-gallon curbside cart \
holds about 0.5 cubic yards; roll-off dumpsters are 10, 20, 30, or 40 cubic \
yards (a 20-yard is roughly 22 ft x 7.5 ft x 4.5 ft).

Packing adjustments: loose furniture and bulky items trap air, so multiply \
apparent volume by 0.7-0.8 when loaded; construction debris packs near 1.0; \
bagged household trash packs near 1.0; brush and green waste compress to \
0.5-0.7 of apparent volume. Estimate as-loaded volume, not apparent volume.

Respond in this structure:
SCENE ANALYSIS: <one or two sentences describing what is visible and in scope>
BREAKDOWN BY AREA: <one line per photo: \"Photo N: <material>, ~<volume>\">
Estimated Volume: <low>-<high> cubic yards
Confidence: <Low|Medium|High>
Notes: <one short sentence, or None>";

/// Which policy document requests are sent with. Selected by configuration;
/// exactly one profile is in effect for a running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyProfile {
    #[default]
    Standard,
    SceneAnalysis,
}

impl PolicyProfile {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(PolicyProfile::Standard),
            "scene_analysis" => Some(PolicyProfile::SceneAnalysis),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PolicyProfile::Standard => "standard",
            PolicyProfile::SceneAnalysis => "scene_analysis",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            PolicyProfile::Standard => POLICY_STANDARD_V1,
            PolicyProfile::SceneAnalysis => POLICY_SCENE_ANALYSIS_V1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_through_name() {
        for profile in [PolicyProfile::Standard, PolicyProfile::SceneAnalysis] {
            assert_eq!(PolicyProfile::from_name(profile.name()), Some(profile));
        }
    }

    #[test]
    fn unknown_profile_name_is_rejected() {
        assert_eq!(PolicyProfile::from_name("freeform"), None);
    }

    #[test]
    fn every_profile_requests_a_confidence_line() {
        for profile in [PolicyProfile::Standard, PolicyProfile::SceneAnalysis] {
            assert!(profile.text().contains("Confidence: <Low|Medium|High>"));
        }
    }

    #[test]
    fn every_profile_excludes_the_container() {
        for profile in [PolicyProfile::Standard, PolicyProfile::SceneAnalysis] {
            assert!(profile.text().contains("NEVER counted as volume"));
        }
    }
}
