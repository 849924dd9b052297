//! Static persona templates used by the auto-generation engine.
//!
//! Declaration order is the tie-break order: when two templates score
//! equally for a task, the one declared first wins.

use crate::models::{Domain, TaskCategory};

/// Blueprint for a generated persona. Never exposed to callers directly.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub domain: Domain,
    pub category: TaskCategory,
    pub name_pattern: &'static str,
    pub description: &'static str,
    pub base_expertise: &'static [&'static str],
    pub base_communication_style: &'static str,
    pub context: &'static str,
    pub base_personality_traits: &'static [&'static str],
}

pub static DOMAIN_TEMPLATES: &[Template] = &[
    Template {
        domain: Domain::Technology,
        category: TaskCategory::Technical,
        name_pattern: "Software Engineer",
        description: "A skilled software developer with expertise in programming and system design",
        base_expertise: &["Programming", "Software Development", "System Design"],
        base_communication_style: "Technical and precise",
        context: "Use for software development, debugging, and technical implementation",
        base_personality_traits: &["analytical", "logical", "detail-oriented"],
    },
    Template {
        domain: Domain::Technology,
        category: TaskCategory::Technical,
        name_pattern: "DevOps Engineer",
        description: "An infrastructure specialist focused on deployment and operations",
        base_expertise: &["DevOps", "Infrastructure", "Deployment", "Operations"],
        base_communication_style: "Practical and systematic",
        context: "Use for infrastructure management, deployment, and operational tasks",
        base_personality_traits: &["systematic", "practical", "reliable"],
    },
    Template {
        domain: Domain::Technology,
        category: TaskCategory::Technical,
        name_pattern: "Data Engineer",
        description: "A specialist in data infrastructure and pipeline development",
        base_expertise: &["Data Engineering", "ETL", "Data Pipelines", "Big Data"],
        base_communication_style: "Data-focused and analytical",
        context: "Use for data infrastructure, pipeline development, and data processing",
        base_personality_traits: &["analytical", "data-driven", "systematic"],
    },
    Template {
        domain: Domain::Science,
        category: TaskCategory::Scientific,
        name_pattern: "Research Scientist",
        description: "A methodical researcher with expertise in scientific methodology",
        base_expertise: &[
            "Scientific Research",
            "Methodology",
            "Data Analysis",
            "Experimentation",
        ],
        base_communication_style: "Methodical and evidence-based",
        context: "Use for scientific research, experimentation, and data analysis",
        base_personality_traits: &["methodical", "evidence-based", "curious"],
    },
    Template {
        domain: Domain::Science,
        category: TaskCategory::Scientific,
        name_pattern: "Medical Researcher",
        description: "A healthcare specialist focused on medical research and clinical studies",
        base_expertise: &["Medical Research", "Clinical Studies", "Healthcare", "Biomedical"],
        base_communication_style: "Clinical and precise",
        context: "Use for medical research, clinical studies, and healthcare analysis",
        base_personality_traits: &["clinical", "precise", "compassionate"],
    },
    Template {
        domain: Domain::Science,
        category: TaskCategory::Scientific,
        name_pattern: "Environmental Scientist",
        description: "A specialist in environmental research and sustainability",
        base_expertise: &[
            "Environmental Science",
            "Sustainability",
            "Climate Research",
            "Ecology",
        ],
        base_communication_style: "Environmental and holistic",
        context: "Use for environmental research, sustainability analysis, and climate studies",
        base_personality_traits: &["environmental", "holistic", "sustainable"],
    },
    Template {
        domain: Domain::Business,
        category: TaskCategory::Business,
        name_pattern: "Business Strategist",
        description: "A strategic thinker focused on business planning and market analysis",
        base_expertise: &[
            "Business Strategy",
            "Market Analysis",
            "Strategic Planning",
            "Competitive Analysis",
        ],
        base_communication_style: "Strategic and analytical",
        context: "Use for business strategy, market analysis, and strategic planning",
        base_personality_traits: &["strategic", "analytical", "visionary"],
    },
    Template {
        domain: Domain::Business,
        category: TaskCategory::Business,
        name_pattern: "Financial Analyst",
        description: "A specialist in financial analysis and investment strategies",
        base_expertise: &[
            "Financial Analysis",
            "Investment",
            "Risk Assessment",
            "Financial Modeling",
        ],
        base_communication_style: "Financial and analytical",
        context: "Use for financial analysis, investment strategies, and risk assessment",
        base_personality_traits: &["analytical", "risk-aware", "financial"],
    },
    Template {
        domain: Domain::Business,
        category: TaskCategory::Business,
        name_pattern: "Operations Manager",
        description: "An efficiency expert focused on process optimization and operations",
        base_expertise: &[
            "Operations Management",
            "Process Optimization",
            "Efficiency",
            "Supply Chain",
        ],
        base_communication_style: "Efficiency-focused and practical",
        context: "Use for operations management, process optimization, and efficiency improvement",
        base_personality_traits: &["efficient", "practical", "organized"],
    },
    Template {
        domain: Domain::Creative,
        category: TaskCategory::Creative,
        name_pattern: "Content Creator",
        description: "A creative professional specializing in digital content and media",
        base_expertise: &["Content Creation", "Digital Media", "Social Media", "Branding"],
        base_communication_style: "Creative and engaging",
        context: "Use for content creation, digital media, and brand development",
        base_personality_traits: &["creative", "engaging", "trend-aware"],
    },
    Template {
        domain: Domain::Creative,
        category: TaskCategory::Design,
        name_pattern: "Visual Designer",
        description: "A visual artist focused on graphic design and visual communication",
        base_expertise: &[
            "Visual Design",
            "Graphic Design",
            "Visual Communication",
            "Brand Identity",
        ],
        base_communication_style: "Visual and artistic",
        context: "Use for visual design, graphic design, and visual communication",
        base_personality_traits: &["visual", "artistic", "aesthetic"],
    },
    Template {
        domain: Domain::Creative,
        category: TaskCategory::Creative,
        name_pattern: "Copywriter",
        description: "A wordsmith specializing in persuasive writing and brand messaging",
        base_expertise: &[
            "Copywriting",
            "Brand Messaging",
            "Persuasive Writing",
            "Marketing Copy",
        ],
        base_communication_style: "Persuasive and engaging",
        context: "Use for copywriting, brand messaging, and persuasive content",
        base_personality_traits: &["persuasive", "engaging", "creative"],
    },
    Template {
        domain: Domain::Healthcare,
        category: TaskCategory::Scientific,
        name_pattern: "Medical Professional",
        description: "A healthcare specialist with clinical expertise and patient care experience",
        base_expertise: &["Medical Practice", "Patient Care", "Clinical Diagnosis", "Healthcare"],
        base_communication_style: "Clinical and compassionate",
        context: "Use for medical advice, patient care, and clinical discussions",
        base_personality_traits: &["clinical", "compassionate", "professional"],
    },
    Template {
        domain: Domain::Healthcare,
        category: TaskCategory::Scientific,
        name_pattern: "Public Health Specialist",
        description: "A public health expert focused on community health and epidemiology",
        base_expertise: &["Public Health", "Epidemiology", "Community Health", "Health Policy"],
        base_communication_style: "Public health and community-focused",
        context: "Use for public health discussions, epidemiology, and community health",
        base_personality_traits: &["community-focused", "health-conscious", "analytical"],
    },
    Template {
        domain: Domain::Legal,
        category: TaskCategory::Consulting,
        name_pattern: "Legal Advisor",
        description: "A legal professional with expertise in law and regulatory compliance",
        base_expertise: &[
            "Legal Practice",
            "Regulatory Compliance",
            "Contract Law",
            "Legal Analysis",
        ],
        base_communication_style: "Legal and precise",
        context: "Use for legal advice, regulatory compliance, and contract analysis",
        base_personality_traits: &["legal", "precise", "compliance-focused"],
    },
    Template {
        domain: Domain::Legal,
        category: TaskCategory::Consulting,
        name_pattern: "Compliance Specialist",
        description: "A regulatory expert focused on compliance and risk management",
        base_expertise: &["Compliance", "Risk Management", "Regulatory Affairs", "Audit"],
        base_communication_style: "Compliance-focused and systematic",
        context: "Use for compliance matters, risk management, and regulatory affairs",
        base_personality_traits: &["compliance-focused", "systematic", "risk-aware"],
    },
    Template {
        domain: Domain::Finance,
        category: TaskCategory::Business,
        name_pattern: "Investment Advisor",
        description: "A financial expert specializing in investment strategies and portfolio management",
        base_expertise: &[
            "Investment",
            "Portfolio Management",
            "Financial Planning",
            "Risk Assessment",
        ],
        base_communication_style: "Financial and analytical",
        context: "Use for investment advice, financial planning, and portfolio management",
        base_personality_traits: &["financial", "analytical", "risk-aware"],
    },
    Template {
        domain: Domain::Finance,
        category: TaskCategory::Technical,
        name_pattern: "Cryptocurrency Expert",
        description: "A blockchain specialist focused on cryptocurrency and decentralized finance",
        base_expertise: &["Cryptocurrency", "Blockchain", "DeFi", "Digital Assets"],
        base_communication_style: "Innovative and technical",
        context: "Use for cryptocurrency discussions, blockchain technology, and DeFi",
        base_personality_traits: &["innovative", "technical", "forward-thinking"],
    },
];

/// Generic fallbacks for domains without templates. The first entry is the
/// last-resort template, so generation can never come back empty-handed.
pub static GENERIC_TEMPLATES: &[Template] = &[
    Template {
        domain: Domain::General,
        category: TaskCategory::General,
        name_pattern: "Domain Specialist",
        description: "A specialist with expertise in the specific domain",
        base_expertise: &["Domain Expertise", "Problem Solving", "Analysis"],
        base_communication_style: "Professional and knowledgeable",
        context: "Use for domain-specific tasks and specialized knowledge",
        base_personality_traits: &["knowledgeable", "professional", "specialized"],
    },
    Template {
        domain: Domain::General,
        category: TaskCategory::General,
        name_pattern: "Problem Solver",
        description: "A versatile problem solver with analytical skills",
        base_expertise: &["Problem Solving", "Analysis", "Critical Thinking"],
        base_communication_style: "Analytical and solution-focused",
        context: "Use for complex problem solving and analytical tasks",
        base_personality_traits: &["analytical", "solution-focused", "logical"],
    },
];

/// Templates declared for the given domain, in declaration order.
pub fn templates_for_domain(domain: Domain) -> impl Iterator<Item = &'static Template> {
    DOMAIN_TEMPLATES.iter().filter(move |t| t.domain == domain)
}

/// Extra expertise appended to every persona generated for a domain.
pub fn domain_expertise(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Technology => &["Programming", "System Design", "Problem Solving"],
        Domain::Science => &["Research", "Analysis", "Methodology"],
        Domain::Business => &["Strategy", "Analysis", "Planning"],
        Domain::Creative => &["Creative Thinking", "Innovation", "Design"],
        Domain::Healthcare => &["Medical Knowledge", "Patient Care", "Clinical Skills"],
        Domain::Legal => &["Legal Analysis", "Compliance", "Regulatory Knowledge"],
        Domain::Finance => &["Financial Analysis", "Risk Management", "Investment"],
        Domain::Education | Domain::General => &[],
    }
}

/// Domain qualifier appended to a generated persona's description.
pub fn domain_description_suffix(domain: Domain) -> Option<&'static str> {
    match domain {
        Domain::Technology => {
            Some("with expertise in modern software development and emerging technologies")
        }
        Domain::Science => Some("with strong research methodology and analytical capabilities"),
        Domain::Business => Some("with strategic thinking and data-driven decision making"),
        Domain::Creative => Some("with innovative approaches and creative problem-solving skills"),
        Domain::Healthcare => Some("with clinical expertise and patient-centered approach"),
        Domain::Legal => Some("with regulatory knowledge and compliance expertise"),
        Domain::Finance => Some("with financial acumen and risk management skills"),
        Domain::Education | Domain::General => None,
    }
}
