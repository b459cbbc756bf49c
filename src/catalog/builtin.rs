use crate::template::{BudgetRange, ProjectTemplate, TaskBlueprint, TaskPriority};

use TaskPriority::{High, Low, Medium, Urgent};

fn task(
    title: &str,
    description: &str,
    priority: TaskPriority,
    estimated_days: i64,
    category: &str,
) -> TaskBlueprint {
    TaskBlueprint::new(title, description, priority, estimated_days, category)
}

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: &str,
    estimated_duration: i64,
    budget_range: BudgetRange,
    tasks: Vec<TaskBlueprint>,
    suggested_documents: &[&str],
) -> ProjectTemplate {
    ProjectTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category: category.to_string(),
        estimated_duration,
        budget_range,
        tasks,
        suggested_documents: suggested_documents.iter().map(|d| d.to_string()).collect(),
    }
}

pub(super) fn templates() -> Vec<ProjectTemplate> {
    vec![
        kitchen_renovation(),
        bathroom_renovation(),
        historic_restoration(),
        roof_replacement(),
        energy_efficiency_upgrade(),
        basement_finishing(),
        exterior_painting(),
    ]
}

fn kitchen_renovation() -> ProjectTemplate {
    template(
        "kitchen-renovation",
        "Kitchen Renovation",
        "Full kitchen remodel including cabinets, countertops, appliances and fixtures.",
        "kitchen",
        "renovation",
        60,
        BudgetRange::new(15_000, 50_000),
        vec![
            task(
                "Design and planning",
                "Finalise layout, select cabinets, countertops and appliances.",
                High,
                7,
                "planning",
            ),
            task(
                "Obtain permits",
                "Apply for building, electrical and plumbing permits.",
                Urgent,
                14,
                "permits",
            ),
            task(
                "Demolition",
                "Remove existing cabinets, countertops, flooring and appliances.",
                High,
                3,
                "demolition",
            ),
            task(
                "Plumbing and electrical rough-in",
                "Relocate supply lines, drains, circuits and outlets to the new layout.",
                High,
                5,
                "installation",
            ),
            task(
                "Drywall and painting",
                "Patch or replace drywall, prime and paint walls and ceiling.",
                Medium,
                4,
                "finishing",
            ),
            task(
                "Cabinet installation",
                "Install base and wall cabinets, level and secure.",
                High,
                4,
                "installation",
            ),
            task(
                "Countertop installation",
                "Template, fabricate and install countertops and backsplash.",
                High,
                7,
                "installation",
            ),
            task(
                "Appliance installation",
                "Install and connect range, dishwasher, refrigerator and hood.",
                Medium,
                2,
                "installation",
            ),
            task(
                "Final inspection",
                "Schedule municipal inspection and close out permits.",
                Urgent,
                2,
                "inspection",
            ),
        ],
        &[
            "Kitchen design plans",
            "Building permit",
            "Contractor agreement",
            "Appliance warranties",
            "Material invoices",
        ],
    )
}

fn bathroom_renovation() -> ProjectTemplate {
    template(
        "bathroom-renovation",
        "Bathroom Renovation",
        "Bathroom remodel covering fixtures, tiling, waterproofing and ventilation.",
        "bath",
        "renovation",
        30,
        BudgetRange::new(8_000, 25_000),
        vec![
            task(
                "Design and fixture selection",
                "Choose vanity, toilet, shower or tub, tile and lighting.",
                High,
                5,
                "planning",
            ),
            task(
                "Obtain permits",
                "Apply for plumbing and electrical permits.",
                Urgent,
                7,
                "permits",
            ),
            task(
                "Demolition",
                "Strip fixtures, tile and damaged subfloor.",
                High,
                2,
                "demolition",
            ),
            task(
                "Plumbing rough-in",
                "Move drains and supply lines, set shower valve.",
                High,
                3,
                "installation",
            ),
            task(
                "Waterproofing",
                "Install membrane in wet areas and flood test.",
                Urgent,
                2,
                "installation",
            ),
            task(
                "Tiling",
                "Lay floor and wall tile, grout and seal.",
                Medium,
                5,
                "finishing",
            ),
            task(
                "Fixture installation",
                "Install vanity, toilet, shower trim, mirrors and accessories.",
                Medium,
                3,
                "installation",
            ),
            task(
                "Final inspection",
                "Inspect plumbing and electrical work and close permits.",
                High,
                1,
                "inspection",
            ),
        ],
        &[
            "Bathroom layout",
            "Plumbing permit",
            "Fixture specifications",
            "Waterproofing certificate",
        ],
    )
}

fn historic_restoration() -> ProjectTemplate {
    template(
        "historic-restoration",
        "Historic Home Restoration",
        "Conservation-led restoration of a listed or heritage property.",
        "landmark",
        "restoration",
        180,
        BudgetRange::new(50_000, 250_000),
        vec![
            task(
                "Heritage assessment",
                "Survey original fabric and document significant features.",
                Urgent,
                14,
                "planning",
            ),
            task(
                "Heritage consent",
                "Submit restoration plans to the heritage authority.",
                Urgent,
                45,
                "permits",
            ),
            task(
                "Structural stabilisation",
                "Repair foundations, framing and load-bearing masonry.",
                Urgent,
                30,
                "structural",
            ),
            task(
                "Roof and envelope repair",
                "Restore roof covering, flashing, chimneys and weatherproofing.",
                High,
                21,
                "exterior",
            ),
            task(
                "Window restoration",
                "Repair original sashes, reglaze and draught-proof.",
                Medium,
                14,
                "exterior",
            ),
            task(
                "Interior plaster and joinery",
                "Lime plaster repairs and restoration of mouldings and joinery.",
                Medium,
                30,
                "finishing",
            ),
            task(
                "Services upgrade",
                "Sensitively route new wiring, plumbing and heating.",
                High,
                20,
                "installation",
            ),
            task(
                "Completion survey",
                "Final heritage sign-off and record of works.",
                High,
                6,
                "inspection",
            ),
        ],
        &[
            "Heritage statement",
            "Listed building consent",
            "Conservation method statement",
            "Structural engineer report",
            "Photographic record",
        ],
    )
}

fn roof_replacement() -> ProjectTemplate {
    template(
        "roof-replacement",
        "Roof Replacement",
        "Tear-off and replacement of the roof covering, underlayment and flashing.",
        "home",
        "maintenance",
        14,
        BudgetRange::new(8_000, 30_000),
        vec![
            task(
                "Roof inspection and quote",
                "Inspect decking, measure the roof and gather quotes.",
                High,
                3,
                "planning",
            ),
            task(
                "Order materials",
                "Order shingles or tiles, underlayment and flashing.",
                Medium,
                4,
                "procurement",
            ),
            task(
                "Tear-off",
                "Strip existing covering and inspect decking.",
                High,
                1,
                "demolition",
            ),
            task(
                "Decking repair",
                "Replace rotten sheathing boards.",
                High,
                0,
                "structural",
            ),
            task(
                "Install underlayment and covering",
                "Lay underlayment, ice shield and new roof covering.",
                High,
                3,
                "installation",
            ),
            task(
                "Flashing and gutters",
                "Install flashing, ridge vents and gutters.",
                Medium,
                1,
                "installation",
            ),
            task(
                "Cleanup and inspection",
                "Magnetic sweep of the site and final walkthrough.",
                Low,
                1,
                "inspection",
            ),
        ],
        &[
            "Roofing contract",
            "Material warranty",
            "Insurance certificate",
        ],
    )
}

fn energy_efficiency_upgrade() -> ProjectTemplate {
    template(
        "energy-efficiency-upgrade",
        "Energy Efficiency Upgrade",
        "Insulation, air sealing, heat pump and solar improvements.",
        "zap",
        "energy",
        45,
        BudgetRange::new(10_000, 40_000),
        vec![
            task(
                "Energy audit",
                "Blower-door test and thermal imaging survey.",
                High,
                3,
                "planning",
            ),
            task(
                "Apply for rebates",
                "Submit grant and utility rebate applications.",
                Medium,
                10,
                "permits",
            ),
            task(
                "Air sealing",
                "Seal penetrations, top plates and rim joists.",
                High,
                3,
                "installation",
            ),
            task(
                "Insulation",
                "Add attic and wall insulation to target R-values.",
                High,
                5,
                "installation",
            ),
            task(
                "Heat pump installation",
                "Install heat pump and decommission old system.",
                High,
                7,
                "installation",
            ),
            task(
                "Solar installation",
                "Mount panels, inverter and grid connection.",
                Medium,
                10,
                "installation",
            ),
            task(
                "Post-upgrade audit",
                "Repeat blower-door test and file rebate paperwork.",
                Medium,
                5,
                "inspection",
            ),
        ],
        &[
            "Energy audit report",
            "Rebate application",
            "Equipment specifications",
            "Grid interconnection agreement",
        ],
    )
}

fn basement_finishing() -> ProjectTemplate {
    template(
        "basement-finishing",
        "Basement Finishing",
        "Convert an unfinished basement into habitable living space.",
        "layers",
        "improvement",
        50,
        BudgetRange::new(20_000, 60_000),
        vec![
            task(
                "Moisture assessment",
                "Check for leaks and plan drainage or dehumidification.",
                Urgent,
                3,
                "planning",
            ),
            task(
                "Obtain permits",
                "Building permit including egress and electrical work.",
                Urgent,
                14,
                "permits",
            ),
            task(
                "Framing",
                "Frame exterior walls, partitions and soffits.",
                High,
                5,
                "structural",
            ),
            task(
                "Electrical and plumbing rough-in",
                "Run circuits, lighting and any bathroom plumbing.",
                High,
                5,
                "installation",
            ),
            task(
                "Insulation and drywall",
                "Insulate, hang drywall, tape and mud.",
                Medium,
                7,
                "finishing",
            ),
            task(
                "Flooring",
                "Install subfloor system and finished flooring.",
                Medium,
                4,
                "finishing",
            ),
            task(
                "Trim and paint",
                "Install doors, trim and paint throughout.",
                Low,
                5,
                "finishing",
            ),
            task(
                "Final inspection",
                "Inspection and certificate of occupancy.",
                High,
                2,
                "inspection",
            ),
        ],
        &[
            "Floor plan",
            "Building permit",
            "Egress window specification",
            "Inspection certificate",
        ],
    )
}

fn exterior_painting() -> ProjectTemplate {
    template(
        "exterior-painting",
        "Exterior Painting",
        "Prepare and repaint siding, trim and doors.",
        "paintbrush",
        "maintenance",
        10,
        BudgetRange::new(3_000, 12_000),
        vec![
            task(
                "Colour selection",
                "Choose paint system and colours, check HOA rules.",
                Low,
                2,
                "planning",
            ),
            task(
                "Surface preparation",
                "Pressure wash, scrape, sand and repair rotten trim.",
                High,
                3,
                "preparation",
            ),
            task(
                "Prime and caulk",
                "Spot prime bare wood and caulk joints.",
                Medium,
                1,
                "preparation",
            ),
            task(
                "Paint application",
                "Apply two finish coats to siding and trim.",
                High,
                3,
                "finishing",
            ),
            task(
                "Touch-up and walkthrough",
                "Touch up and final walkthrough with owner.",
                Low,
                1,
                "inspection",
            ),
        ],
        &["Painting contract", "Colour schedule", "Paint data sheets"],
    )
}
