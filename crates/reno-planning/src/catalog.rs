//! Static renovation catalogue: areas, scopes and fixed task lists

use reno_core::StepTemplate;

use crate::templates;

/// Tasks that open every board, in order
pub const PLANNING_TASKS: &[&str] = &[
    "Construction Contract Executed",
    "Architectural Plan Development",
    "Interior Design and Selections",
    "Permit Applications and Approvals",
    "Budget Finalization and Approval",
    "Timeline and Milestone Planning",
    "Contractor Selection and Vetting",
    "Material and Fixture Selection",
    "Engineering and Structural Analysis",
    "Final Design Review and Sign-off",
];

/// Permit tasks that follow the planning group, in order
pub const PERMITTING_TASKS: &[&str] = &[
    "Submit demolition permit",
    "Submit building permit application",
    "Submit pool permit application",
    "Submit electrical permit application",
    "Submit plumbing permit application",
    "Submit HVAC permit application",
    "All permits approved",
];

/// Area name paired with its selectable scopes
pub type AreaEntry = (&'static str, &'static [&'static str]);

pub const AREAS: &[AreaEntry] = &[
    (
        "Kitchen",
        &[
            "Cabinet replacement/refacing",
            "Countertop installation (granite, quartz, marble)",
            "Appliance upgrades (refrigerator, stove, dishwasher)",
            "Backsplash installation",
            "Flooring replacement",
            "Plumbing modifications",
            "Electrical updates (outlets, lighting)",
            "Island or peninsula addition",
            "Pantry installation",
            "Kitchen exhaust and ventilation",
            "Paint and wall treatments",
            "Window and door replacement",
            "Ceiling updates and lighting fixtures",
        ],
    ),
    (
        "Bathroom",
        &[
            "Bathtub/shower replacement or renovation",
            "Vanity and sink installation",
            "Toilet replacement or upgrade",
            "Tile work (floor and wall)",
            "Plumbing fixture updates",
            "Electrical work (lighting, outlets, ventilation)",
            "Flooring replacement",
            "Paint and wall treatments",
            "Mirror and storage solutions",
            "Heated flooring installation",
            "Accessibility modifications",
            "Ventilation fan installation",
            "Waterproofing and moisture control",
        ],
    ),
    (
        "Living Room",
        &[
            "Flooring replacement or refinishing",
            "Paint and wall treatments",
            "Fireplace installation or renovation",
            "Built-in storage solutions",
            "Electrical updates (outlets, lighting)",
            "Crown molding and trim work",
            "Window treatments and replacements",
            "Ceiling updates and fixtures",
            "Entertainment center installation",
            "Accent wall creation",
            "Furniture and layout planning",
            "Smart home technology integration",
        ],
    ),
    (
        "Bedroom",
        &[
            "Flooring replacement or refinishing",
            "Paint and wall treatments",
            "Closet organization and built-ins",
            "Electrical updates (outlets, lighting)",
            "Window treatments and replacements",
            "Crown molding and trim work",
            "Ceiling updates and fixtures",
            "Built-in storage solutions",
            "Accent wall creation",
            "Master suite bathroom connection",
            "Walk-in closet construction",
            "Bedroom furniture planning",
        ],
    ),
    (
        "Basement",
        &[
            "Waterproofing and moisture control",
            "Flooring installation",
            "Ceiling and insulation work",
            "Electrical system upgrades",
            "Plumbing rough-in",
            "Heating and ventilation",
            "Wall framing and drywall",
            "Paint and finishing work",
            "Egress window installation",
            "Basement bathroom addition",
            "Recreation room setup",
            "Storage solutions and organization",
            "Staircase renovation",
        ],
    ),
    (
        "Attic",
        &[
            "Insulation installation or upgrade",
            "Ventilation system installation",
            "Flooring installation",
            "Electrical system installation",
            "Skylight installation",
            "Staircase or ladder installation",
            "Storage solutions",
            "Conversion to living space",
            "Dormer addition",
            "Roof structural modifications",
            "Heating and cooling integration",
            "Finished ceiling installation",
        ],
    ),
    (
        "Exterior/Facade",
        &[
            "Siding replacement or repair",
            "Exterior painting",
            "Roof replacement or repair",
            "Window replacement",
            "Door replacement (entry, patio)",
            "Deck or patio construction",
            "Landscaping and garden work",
            "Driveway and walkway installation",
            "Exterior lighting installation",
            "Fence installation or repair",
            "Gutter and downspout installation",
            "Foundation work and grading",
            "Outdoor kitchen or entertainment area",
        ],
    ),
    (
        "Office Spaces",
        &[
            "Electrical upgrades for technology",
            "Built-in desk and storage solutions",
            "Flooring replacement",
            "Paint and wall treatments",
            "Lighting optimization",
            "Soundproofing installation",
            "Climate control systems",
            "Network and cable management",
            "Ergonomic workspace design",
            "Conference room setup",
            "Reception area design",
            "Security system installation",
            "Accessibility compliance upgrades",
        ],
    ),
    (
        "Retail Storefront",
        &[
            "Storefront glass and entrance design",
            "Interior layout and fixtures",
            "Display and shelving systems",
            "Lighting design and installation",
            "Flooring for high-traffic areas",
            "Cash wrap and checkout area",
            "Security system installation",
            "HVAC system upgrades",
            "Electrical and technology infrastructure",
            "Signage and branding elements",
            "Customer seating areas",
            "Storage and back-office spaces",
            "ADA compliance modifications",
        ],
    ),
    (
        "Healthcare Facilities",
        &[
            "Medical equipment installation",
            "Specialized flooring (anti-microbial)",
            "Medical gas and suction systems",
            "Infection control measures",
            "Waiting room and reception design",
            "Patient room configuration",
            "Specialized lighting systems",
            "HVAC with medical-grade filtration",
            "Electrical systems for medical equipment",
            "Privacy and sound control",
            "Emergency power systems",
            "Compliance with health regulations",
            "Sterilization and cleaning stations",
        ],
    ),
    (
        "Educational Spaces",
        &[
            "Classroom layout and furniture",
            "Technology integration (smart boards, projectors)",
            "Lighting optimization for learning",
            "Acoustics and sound control",
            "Flooring for durability and safety",
            "Storage and organization systems",
            "Safety and security upgrades",
            "HVAC system optimization",
            "Accessibility compliance",
            "Laboratory and specialized room setup",
            "Cafeteria and common area design",
            "Playground and outdoor learning spaces",
            "Library and media center renovation",
        ],
    ),
    (
        "HVAC Systems",
        &[
            "Central air conditioning installation",
            "Heating system replacement or upgrade",
            "Ductwork installation or modification",
            "Ventilation system upgrades",
            "Thermostat and control system installation",
            "Air quality improvement systems",
            "Insulation upgrades",
            "Zoning system installation",
            "Energy efficiency upgrades",
            "Smart home HVAC integration",
            "Radiant heating installation",
            "Heat pump installation",
            "Maintenance and service planning",
        ],
    ),
    (
        "Electrical Systems",
        &[
            "Panel upgrade and electrical service increase",
            "New outlet and switch installation",
            "Lighting fixture installation and upgrades",
            "Ceiling fan installation",
            "Electrical safety inspections and updates",
            "Smart home wiring and automation",
            "Security system wiring",
            "Electrical code compliance updates",
            "Emergency generator installation",
            "Electric vehicle charging station",
            "Landscape lighting installation",
            "Electrical troubleshooting and repairs",
            "Energy monitoring system installation",
        ],
    ),
    (
        "Plumbing Systems",
        &[
            "Pipe replacement or repiping",
            "Fixture installation (sinks, toilets, showers)",
            "Water heater replacement or upgrade",
            "Drain cleaning and repair",
            "Sewer line inspection and repair",
            "Water pressure optimization",
            "Leak detection and repair",
            "Water filtration system installation",
            "Bathroom and kitchen plumbing upgrades",
            "Outdoor irrigation system installation",
            "Plumbing code compliance updates",
            "Emergency plumbing repairs",
            "Water conservation upgrades",
        ],
    ),
    (
        "Structural Elements",
        &[
            "Foundation repair and reinforcement",
            "Load-bearing wall modifications",
            "Beam and column installation",
            "Structural engineering assessments",
            "Earthquake or seismic retrofitting",
            "Roof structural repairs",
            "Floor joist replacement or reinforcement",
            "Basement or crawl space structural work",
            "Staircase structural modifications",
            "Deck and patio structural work",
            "Retaining wall construction",
            "Structural code compliance updates",
            "Building permit structural requirements",
        ],
    ),
];

/// The two fixed task lists that open every board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTaskLists {
    pub planning: Vec<String>,
    pub permitting: Vec<String>,
}

/// Read-only lookup over areas, scopes and step templates
///
/// Implementations hand out copies; callers never mutate catalogue data.
pub trait Catalog: Send + Sync {
    /// All area names, in catalogue order
    fn areas(&self) -> Vec<String>;

    /// Scopes for an area, or `None` if the area is unknown
    fn scopes_for_area(&self, area: &str) -> Option<Vec<String>>;

    /// Step breakdown for a scope, if one exists
    fn step_template(&self, area: &str, scope: &str) -> Option<StepTemplate>;

    fn fixed_task_lists(&self) -> FixedTaskLists;

    fn has_scope(&self, area: &str, scope: &str) -> bool {
        self.scopes_for_area(area)
            .map(|scopes| scopes.iter().any(|s| s == scope))
            .unwrap_or(false)
    }
}

/// Catalogue backed by the compiled-in tables
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl Catalog for StaticCatalog {
    fn areas(&self) -> Vec<String> {
        AREAS.iter().map(|(area, _)| area.to_string()).collect()
    }

    fn scopes_for_area(&self, area: &str) -> Option<Vec<String>> {
        AREAS
            .iter()
            .find(|(name, _)| *name == area)
            .map(|(_, scopes)| scopes.iter().map(|s| s.to_string()).collect())
    }

    fn step_template(&self, area: &str, scope: &str) -> Option<StepTemplate> {
        templates::find(area, scope)
    }

    fn fixed_task_lists(&self) -> FixedTaskLists {
        FixedTaskLists {
            planning: PLANNING_TASKS.iter().map(|t| t.to_string()).collect(),
            permitting: PERMITTING_TASKS.iter().map(|t| t.to_string()).collect(),
        }
    }
}
