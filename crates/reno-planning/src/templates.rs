//! Step breakdown templates for common scopes

use reno_core::Priority::{self, High, Low, Medium};
use reno_core::{Step, StepTemplate};

struct StepSpec {
    name: &'static str,
    description: &'static str,
    days: u32,
    priority: Priority,
    deps: &'static [&'static str],
    compliance: &'static [&'static str],
}

struct TemplateSpec {
    area: &'static str,
    scope: &'static str,
    steps: &'static [StepSpec],
}

impl StepSpec {
    fn to_step(&self) -> Step {
        Step::new(self.name, self.description, self.days, self.priority)
            .with_dependencies(self.deps)
            .with_compliance(self.compliance)
    }
}

impl TemplateSpec {
    fn to_template(&self) -> StepTemplate {
        StepTemplate {
            area: self.area.to_string(),
            scope: self.scope.to_string(),
            steps: self.steps.iter().map(StepSpec::to_step).collect(),
        }
    }
}

const TEMPLATES: &[TemplateSpec] = &[
    TemplateSpec {
        area: "Kitchen",
        scope: "Cabinet replacement/refacing",
        steps: &[
            StepSpec {
                name: "Planning & Measurement",
                description: "Measure walls, openings and appliance clearances; confirm layout and cabinet order",
                days: 2,
                priority: High,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Remove Existing Cabinets",
                description: "Disconnect plumbing and appliances, remove countertops and old cabinet boxes",
                days: 2,
                priority: High,
                deps: &["Planning & Measurement"],
                compliance: &["Shut off water and power before disconnecting fixtures"],
            },
            StepSpec {
                name: "Prep the Space",
                description: "Patch and level walls, locate studs, relocate outlets or supply lines if required",
                days: 2,
                priority: Medium,
                deps: &["Remove Existing Cabinets"],
                compliance: &["Electrical relocation requires a licensed electrician"],
            },
            StepSpec {
                name: "Install Cabinet Boxes",
                description: "Hang upper cabinets, set and level base cabinets, fasten to studs and each other",
                days: 3,
                priority: High,
                deps: &["Prep the Space"],
                compliance: &["Anchor upper cabinets into framing, not drywall"],
            },
            StepSpec {
                name: "Install Doors & Drawer Fronts",
                description: "Mount doors and drawer fronts, adjust hinges for even reveals",
                days: 2,
                priority: Medium,
                deps: &["Install Cabinet Boxes"],
                compliance: &[],
            },
            StepSpec {
                name: "Add Hardware & Accessories",
                description: "Install pulls, knobs, soft-close fittings and interior organizers",
                days: 1,
                priority: Low,
                deps: &["Install Doors & Drawer Fronts"],
                compliance: &[],
            },
        ],
    },
    TemplateSpec {
        area: "Kitchen",
        scope: "Countertop installation (granite, quartz, marble)",
        steps: &[
            StepSpec {
                name: "Select Slab & Edge Profile",
                description: "Choose material, slab and edge profile; confirm sink and cooktop models",
                days: 3,
                priority: High,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Template Countertops",
                description: "Fabricator templates base cabinets after they are level and secured",
                days: 1,
                priority: High,
                deps: &["Select Slab & Edge Profile"],
                compliance: &[],
            },
            StepSpec {
                name: "Fabricate Countertops",
                description: "Cut slab, sink and cooktop openings, polish edges",
                days: 7,
                priority: Medium,
                deps: &["Template Countertops"],
                compliance: &[],
            },
            StepSpec {
                name: "Install Countertops",
                description: "Set slabs, epoxy seams, attach undermount sink",
                days: 1,
                priority: High,
                deps: &["Fabricate Countertops"],
                compliance: &["Support overhangs beyond 10 inches with brackets"],
            },
            StepSpec {
                name: "Seal & Reconnect Fixtures",
                description: "Seal natural stone, reconnect faucet, disposal and cooktop",
                days: 1,
                priority: Medium,
                deps: &["Install Countertops"],
                compliance: &["Gas cooktop reconnection by a licensed professional"],
            },
        ],
    },
    TemplateSpec {
        area: "Kitchen",
        scope: "Backsplash installation",
        steps: &[
            StepSpec {
                name: "Select Tile & Layout",
                description: "Choose tile and grout, plan layout around outlets and windows",
                days: 2,
                priority: Medium,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Prepare Wall Surface",
                description: "Remove old backsplash, repair drywall, extend outlet boxes",
                days: 1,
                priority: Medium,
                deps: &["Select Tile & Layout"],
                compliance: &["Outlets behind counters must remain GFCI protected"],
            },
            StepSpec {
                name: "Set Tile",
                description: "Apply thinset and set tile with consistent spacing",
                days: 2,
                priority: High,
                deps: &["Prepare Wall Surface"],
                compliance: &[],
            },
            StepSpec {
                name: "Grout & Seal",
                description: "Grout joints, caulk the countertop line, seal grout",
                days: 1,
                priority: Low,
                deps: &["Set Tile"],
                compliance: &[],
            },
        ],
    },
    TemplateSpec {
        area: "Bathroom",
        scope: "Toilet replacement or upgrade",
        steps: &[
            StepSpec {
                name: "Select Fixture & Verify Rough-In",
                description: "Measure rough-in distance and choose a compatible toilet model",
                days: 2,
                priority: High,
                deps: &[],
                compliance: &["Maximum 1.28 gallons per flush where water-efficiency codes apply"],
            },
            StepSpec {
                name: "Shut Off Water & Remove Old Toilet",
                description: "Close supply valve, drain tank and bowl, unbolt and lift out the old toilet",
                days: 1,
                priority: High,
                deps: &["Select Fixture & Verify Rough-In"],
                compliance: &[],
            },
            StepSpec {
                name: "Inspect Flange & Subfloor",
                description: "Check flange height and condition, repair rot or soft subfloor",
                days: 1,
                priority: High,
                deps: &["Shut Off Water & Remove Old Toilet"],
                compliance: &["Flange must be secured to the subfloor"],
            },
            StepSpec {
                name: "Install New Wax Ring & Toilet",
                description: "Set new wax ring, lower toilet onto flange, tighten closet bolts evenly",
                days: 1,
                priority: High,
                deps: &["Inspect Flange & Subfloor"],
                compliance: &[],
            },
            StepSpec {
                name: "Connect Supply Line & Test",
                description: "Attach new supply line, open valve, test flush and check for leaks",
                days: 1,
                priority: Medium,
                deps: &["Install New Wax Ring & Toilet"],
                compliance: &["Plumbing inspection may be required for new supply work"],
            },
            StepSpec {
                name: "Caulk Base & Final Cleanup",
                description: "Caulk around the base, install seat, dispose of the old fixture",
                days: 1,
                priority: Low,
                deps: &["Connect Supply Line & Test"],
                compliance: &[],
            },
        ],
    },
    TemplateSpec {
        area: "Bathroom",
        scope: "Vanity and sink installation",
        steps: &[
            StepSpec {
                name: "Measure & Select Vanity",
                description: "Measure space and plumbing locations, choose vanity, top and faucet",
                days: 2,
                priority: High,
                deps: &[],
                compliance: &["Maintain 21 inches of clearance in front of the toilet and vanity"],
            },
            StepSpec {
                name: "Remove Old Vanity",
                description: "Shut off water, disconnect drain and supplies, remove vanity",
                days: 1,
                priority: Medium,
                deps: &["Measure & Select Vanity"],
                compliance: &[],
            },
            StepSpec {
                name: "Install Vanity Cabinet",
                description: "Level and secure the cabinet to wall studs",
                days: 1,
                priority: High,
                deps: &["Remove Old Vanity"],
                compliance: &[],
            },
            StepSpec {
                name: "Install Top, Sink & Faucet",
                description: "Set top, mount sink and faucet, connect drain and supplies",
                days: 1,
                priority: High,
                deps: &["Install Vanity Cabinet"],
                compliance: &["P-trap required on every fixture drain"],
            },
            StepSpec {
                name: "Leak Test & Finish",
                description: "Run water, check connections, caulk backsplash joint",
                days: 1,
                priority: Low,
                deps: &["Install Top, Sink & Faucet"],
                compliance: &[],
            },
        ],
    },
    TemplateSpec {
        area: "Bathroom",
        scope: "Bathtub/shower replacement or renovation",
        steps: &[
            StepSpec {
                name: "Design & Fixture Selection",
                description: "Choose tub or shower system, valve, trim and wall finish",
                days: 3,
                priority: High,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Demolition",
                description: "Remove old tub or pan and wall surround down to studs",
                days: 2,
                priority: High,
                deps: &["Design & Fixture Selection"],
                compliance: &["Test for asbestos in pre-1980 tile and mastic"],
            },
            StepSpec {
                name: "Plumbing Rough-In",
                description: "Set new mixing valve and drain, pressure test lines",
                days: 2,
                priority: High,
                deps: &["Demolition"],
                compliance: &["Anti-scald pressure-balancing valve required", "Rough plumbing inspection"],
            },
            StepSpec {
                name: "Waterproofing",
                description: "Install cement board and waterproof membrane, flood test pan",
                days: 2,
                priority: High,
                deps: &["Plumbing Rough-In"],
                compliance: &["24-hour flood test before tiling"],
            },
            StepSpec {
                name: "Tile & Fixture Installation",
                description: "Tile walls and floor, install tub or pan, trim and glass",
                days: 5,
                priority: Medium,
                deps: &["Waterproofing"],
                compliance: &["Safety glazing required for shower enclosures"],
            },
            StepSpec {
                name: "Final Inspection & Caulk",
                description: "Caulk changes of plane, test fixtures, final inspection",
                days: 1,
                priority: Medium,
                deps: &["Tile & Fixture Installation"],
                compliance: &["Final plumbing inspection"],
            },
        ],
    },
    TemplateSpec {
        area: "Basement",
        scope: "Waterproofing and moisture control",
        steps: &[
            StepSpec {
                name: "Moisture Assessment",
                description: "Identify water entry points, check grading, gutters and humidity",
                days: 2,
                priority: High,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Exterior Drainage Corrections",
                description: "Regrade soil away from foundation, extend downspouts",
                days: 3,
                priority: Medium,
                deps: &["Moisture Assessment"],
                compliance: &[],
            },
            StepSpec {
                name: "Interior Drain & Sump Installation",
                description: "Cut perimeter trench, lay drain tile, install sump pit and pump",
                days: 4,
                priority: High,
                deps: &["Moisture Assessment"],
                compliance: &["Sump discharge may not connect to the sanitary sewer"],
            },
            StepSpec {
                name: "Seal Walls & Cracks",
                description: "Inject cracks, apply waterproof coating to foundation walls",
                days: 2,
                priority: Medium,
                deps: &["Interior Drain & Sump Installation"],
                compliance: &[],
            },
            StepSpec {
                name: "Dehumidification & Monitoring",
                description: "Install dehumidifier, monitor humidity for two weeks",
                days: 14,
                priority: Low,
                deps: &["Seal Walls & Cracks"],
                compliance: &[],
            },
        ],
    },
    TemplateSpec {
        area: "Attic",
        scope: "Insulation installation or upgrade",
        steps: &[
            StepSpec {
                name: "Energy Audit",
                description: "Measure existing insulation depth and locate air leaks",
                days: 1,
                priority: Medium,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Air Sealing",
                description: "Seal top plates, penetrations and attic hatch",
                days: 2,
                priority: High,
                deps: &["Energy Audit"],
                compliance: &["Fire-rated sealant around flues and chimneys"],
            },
            StepSpec {
                name: "Install Baffles",
                description: "Install rafter vents to keep soffit airflow open",
                days: 1,
                priority: Medium,
                deps: &["Air Sealing"],
                compliance: &[],
            },
            StepSpec {
                name: "Install Insulation",
                description: "Blow in or lay insulation to the target R-value",
                days: 2,
                priority: High,
                deps: &["Install Baffles"],
                compliance: &["Meet local energy code minimum R-value"],
            },
        ],
    },
    TemplateSpec {
        area: "Electrical Systems",
        scope: "Panel upgrade and electrical service increase",
        steps: &[
            StepSpec {
                name: "Load Calculation",
                description: "Calculate current and planned load to size the new service",
                days: 1,
                priority: High,
                deps: &[],
                compliance: &["NEC load calculation required"],
            },
            StepSpec {
                name: "Utility Coordination",
                description: "Schedule disconnect and reconnect with the utility",
                days: 7,
                priority: High,
                deps: &["Load Calculation"],
                compliance: &["Electrical permit must be issued before utility scheduling"],
            },
            StepSpec {
                name: "Panel Replacement",
                description: "Replace panel and meter base, transfer circuits",
                days: 1,
                priority: High,
                deps: &["Utility Coordination"],
                compliance: &["Licensed electrician required"],
            },
            StepSpec {
                name: "Grounding & Bonding",
                description: "Install ground rods and bond water and gas piping",
                days: 1,
                priority: Medium,
                deps: &["Panel Replacement"],
                compliance: &[],
            },
            StepSpec {
                name: "Inspection & Reconnection",
                description: "Pass electrical inspection, utility restores power",
                days: 2,
                priority: High,
                deps: &["Grounding & Bonding"],
                compliance: &["Final electrical inspection"],
            },
        ],
    },
    TemplateSpec {
        area: "Plumbing Systems",
        scope: "Water heater replacement or upgrade",
        steps: &[
            StepSpec {
                name: "Size & Select Unit",
                description: "Size tank or tankless unit for household demand, check venting and gas supply",
                days: 2,
                priority: High,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Drain & Remove Old Heater",
                description: "Shut off fuel and water, drain tank, disconnect and remove",
                days: 1,
                priority: Medium,
                deps: &["Size & Select Unit"],
                compliance: &[],
            },
            StepSpec {
                name: "Install New Heater",
                description: "Set unit, connect water, fuel and venting, install expansion tank",
                days: 1,
                priority: High,
                deps: &["Drain & Remove Old Heater"],
                compliance: &["Temperature and pressure relief valve with discharge pipe", "Seismic strapping where required"],
            },
            StepSpec {
                name: "Test & Inspect",
                description: "Fill, purge air, light or power up, verify temperature and check for leaks",
                days: 1,
                priority: Medium,
                deps: &["Install New Heater"],
                compliance: &["Plumbing or mechanical permit inspection"],
            },
        ],
    },
    TemplateSpec {
        area: "HVAC Systems",
        scope: "Heat pump installation",
        steps: &[
            StepSpec {
                name: "Manual J Load Calculation",
                description: "Calculate heating and cooling load to size the system",
                days: 2,
                priority: High,
                deps: &[],
                compliance: &[],
            },
            StepSpec {
                name: "Equipment Selection",
                description: "Choose ducted or ductless units and confirm rebate eligibility",
                days: 3,
                priority: Medium,
                deps: &["Manual J Load Calculation"],
                compliance: &[],
            },
            StepSpec {
                name: "Install Outdoor & Indoor Units",
                description: "Set condenser pad, mount air handlers, run line sets and condensate",
                days: 2,
                priority: High,
                deps: &["Equipment Selection"],
                compliance: &["EPA 608 certified technician for refrigerant handling"],
            },
            StepSpec {
                name: "Electrical Hookup",
                description: "Run dedicated circuit and disconnect",
                days: 1,
                priority: High,
                deps: &["Install Outdoor & Indoor Units"],
                compliance: &["Dedicated circuit sized per nameplate"],
            },
            StepSpec {
                name: "Commissioning",
                description: "Pressure test, evacuate, charge and verify airflow and controls",
                days: 1,
                priority: Medium,
                deps: &["Electrical Hookup"],
                compliance: &["Mechanical inspection"],
            },
        ],
    },
];

/// Look up a step template by area and scope.
pub fn find(area: &str, scope: &str) -> Option<StepTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.area == area && t.scope == scope)
        .map(TemplateSpec::to_template)
}

/// All templates in declaration order
pub fn all() -> Vec<StepTemplate> {
    TEMPLATES.iter().map(TemplateSpec::to_template).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toilet_template_has_six_ordered_steps() {
        let template = find("Bathroom", "Toilet replacement or upgrade").unwrap();
        assert_eq!(template.steps.len(), 6);
        assert_eq!(template.steps[0].name, "Select Fixture & Verify Rough-In");
        assert!(template.steps[0].dependencies.is_empty());
        assert_eq!(
            template.steps[1].dependencies,
            vec!["Select Fixture & Verify Rough-In".to_string()]
        );
    }

    #[test]
    fn test_unknown_scope_has_no_template() {
        assert!(find("Kitchen", "Toilet replacement or upgrade").is_none());
        assert!(find("Bedroom", "Accent wall creation").is_none());
    }

    #[test]
    fn test_templates_are_unique() {
        let templates = all();
        for (i, a) in templates.iter().enumerate() {
            assert!(!a.steps.is_empty());
            for b in &templates[i + 1..] {
                assert!(!(a.area == b.area && a.scope == b.scope));
            }
        }
    }
}
