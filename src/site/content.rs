//! Copy and data behind the public marketing page.

use url::Url;

pub const COMPANY_NAME: &str = "AKACorpTech";

pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
}

pub const NAV_LINKS: [NavLink; 4] = [
    NavLink {
        name: "About",
        href: "#about",
    },
    NavLink {
        name: "Services",
        href: "#services",
    },
    NavLink {
        name: "Portfolio",
        href: "#portfolio",
    },
    NavLink {
        name: "Contact",
        href: "#contact",
    },
];

/// Entries of the navigation "Services" dropdown
pub const NAV_SERVICES: [&str; 7] = [
    "Custom Software",
    "Web Development",
    "Mobile Apps",
    "Cloud & DevOps",
    "Cybersecurity",
    "AI & ML",
    "Blockchain",
];

// ============================================================================
// Hero & About
// ============================================================================

pub struct Hero {
    pub headline: &'static str,
    pub highlight: &'static str,
    pub headline_tail: &'static str,
    pub tagline: &'static str,
    pub video_url: &'static str,
    pub poster_url: &'static str,
    pub primary_cta: &'static str,
    pub secondary_cta: &'static str,
}

pub const HERO: Hero = Hero {
    headline: "Complete Software &",
    highlight: "IT Solutions",
    headline_tail: "for Your Business",
    tagline: "Powering Digital Evolution with Custom Software, AI, and Cutting-Edge Technology",
    video_url: "https://www.akacorptech.com/images/compressed-vid.mp4",
    poster_url: "/static/placeholder.svg",
    primary_cta: "Talk to Our CTO",
    secondary_cta: "Get a Free Audit",
};

pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

pub const ABOUT_STATS: [Stat; 4] = [
    Stat {
        label: "Expert Developers",
        value: "50+",
    },
    Stat {
        label: "Projects Delivered",
        value: "200+",
    },
    Stat {
        label: "Countries Served",
        value: "15+",
    },
    Stat {
        label: "Cups of Coffee",
        value: "10K+",
    },
];

pub const ABOUT_QUOTE: &str = "Empowering businesses globally with custom software solutions that drive growth and transformation.";

pub const ABOUT_PARAGRAPHS: [&str; 2] = [
    "At AKACorpTech, we're not just developers, we're digital transformation partners. Based in Noida, we specialize in creating scalable, innovative solutions that help businesses thrive in the digital age.",
    "From custom software development to AI-powered applications, we combine cutting-edge technology with deep industry expertise to deliver solutions that matter.",
];

// ============================================================================
// Services & Portfolio
// ============================================================================

pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

pub const SERVICES: [Service; 6] = [
    Service {
        title: "Custom Software Development",
        description: "Tailored software solutions built to meet your unique business requirements and scale with your growth.",
        features: &["Web Applications", "Desktop Software", "API Development", "System Integration"],
    },
    Service {
        title: "Mobile App Development",
        description: "Native and cross-platform mobile applications that deliver exceptional user experiences.",
        features: &["iOS Development", "Android Development", "React Native", "Flutter"],
    },
    Service {
        title: "Cloud & DevOps Solutions",
        description: "Scalable cloud infrastructure and streamlined deployment processes for modern businesses.",
        features: &["AWS/Azure Setup", "CI/CD Pipelines", "Containerization", "Monitoring"],
    },
    Service {
        title: "AI & Machine Learning",
        description: "Intelligent solutions that automate processes and provide data-driven insights.",
        features: &["Predictive Analytics", "NLP Solutions", "Computer Vision", "ML Models"],
    },
    Service {
        title: "Blockchain Development",
        description: "Secure and transparent blockchain solutions for various industry applications.",
        features: &["Smart Contracts", "DeFi Solutions", "NFT Platforms", "Cryptocurrency"],
    },
    Service {
        title: "Digital Marketing",
        description: "Comprehensive digital marketing strategies to boost your online presence and drive growth.",
        features: &["SEO Optimization", "Social Media", "PPC Campaigns", "Content Marketing"],
    },
];

pub struct Project {
    pub title: &'static str,
    pub client: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub category: &'static str,
    pub tags: &'static [&'static str],
}

pub const PROJECTS: [Project; 3] = [
    Project {
        title: "Website Design",
        client: "STOCK STRATEGIX",
        description: "Welcome to Stock Strategix, India's premier stock market service, delivering cutting-edge market insights, trend analysis, and personalized investment strategies for traders and investors.",
        image: "/static/placeholder.svg",
        category: "Design",
        tags: &["UI/UX", "Responsive", "Finance"],
    },
    Project {
        title: "Website Development",
        client: "Crush Car",
        description: "Dispose of your old or unfit vehicle with complete peace of mind. We provide an end-to-end legal scrapping service: transparent, fast, and fully compliant with government norms.",
        image: "/static/placeholder.svg",
        category: "Development",
        tags: &["Web App", "Legal", "Service"],
    },
    Project {
        title: "Software Development",
        client: "B2B International Pvt Ltd",
        description: "At B2B International Pvt Ltd, we help you make smart, profitable financial decisions with expert guidance and customized solutions, whether you're a new investor or an experienced trader.",
        image: "/static/placeholder.svg",
        category: "Software",
        tags: &["B2B", "Finance", "Trading"],
    },
];

// ============================================================================
// Clients & Awards
// ============================================================================

pub const CLIENTS: [&str; 8] = [
    "TechCorp",
    "InnovateLab",
    "DataFlow",
    "CloudTech",
    "AIVentures",
    "BlockchainCo",
    "FinanceFlow",
    "HealthTech",
];

/// The logo strip scrolls endlessly, so the list is laid out twice.
pub fn client_strip() -> impl Iterator<Item = &'static str> {
    CLIENTS.iter().chain(CLIENTS.iter()).copied()
}

pub struct AwardEntry {
    pub title: &'static str,
    pub organization: &'static str,
    pub description: &'static str,
}

pub const AWARDS: [AwardEntry; 3] = [
    AwardEntry {
        title: "Tech Innovation Award 2024",
        organization: "Tech Excellence Council",
        description: "Recognized for outstanding innovation in AI-powered solutions",
    },
    AwardEntry {
        title: "Best IT Services Company",
        organization: "Business Excellence Awards",
        description: "Leading provider of custom software development services",
    },
    AwardEntry {
        title: "Client Choice Award",
        organization: "Industry Standards Board",
        description: "99% client satisfaction rate across all projects",
    },
];

// ============================================================================
// Contact & Footer
// ============================================================================

pub struct ContactInfo {
    pub address_lines: [&'static str; 2],
    pub short_address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub hours: [&'static str; 2],
}

pub const CONTACT: ContactInfo = ContactInfo {
    address_lines: ["AKACorpTech, Sector 63, Noida", "Uttar Pradesh, India - 201301"],
    short_address: "Sector 63, Noida, UP, India",
    phone: "+91-XXX-XXX-XXXX",
    email: "hello@akacorptech.com",
    hours: ["Mon - Fri: 9:00 AM - 7:00 PM", "Sat: 10:00 AM - 4:00 PM"],
};

pub struct ServiceOption {
    pub code: &'static str,
    pub label: &'static str,
}

/// Choices of the contact form's service select
pub const SERVICE_OPTIONS: [ServiceOption; 7] = [
    ServiceOption {
        code: "custom-software",
        label: "Custom Software",
    },
    ServiceOption {
        code: "web-development",
        label: "Web Development",
    },
    ServiceOption {
        code: "mobile-apps",
        label: "Mobile Apps",
    },
    ServiceOption {
        code: "cloud-devops",
        label: "Cloud & DevOps",
    },
    ServiceOption {
        code: "ai-ml",
        label: "AI & Machine Learning",
    },
    ServiceOption {
        code: "blockchain",
        label: "Blockchain",
    },
    ServiceOption {
        code: "consultation",
        label: "Free Consultation",
    },
];

pub const FOOTER_TAGLINE: &str =
    "Empowering businesses globally with custom software solutions and cutting-edge technology.";

pub const FOOTER_QUICK_LINKS: [NavLink; 6] = [
    NavLink {
        name: "About Us",
        href: "#about",
    },
    NavLink {
        name: "Services",
        href: "#services",
    },
    NavLink {
        name: "Portfolio",
        href: "#portfolio",
    },
    NavLink {
        name: "Blog",
        href: "/blog",
    },
    NavLink {
        name: "Contact",
        href: "#contact",
    },
    NavLink {
        name: "Awards",
        href: "#awards",
    },
];

pub const FOOTER_SERVICES: [&str; 8] = [
    "Custom Software",
    "Web Development",
    "Mobile Apps",
    "Cloud & DevOps",
    "AI & ML",
    "Blockchain",
    "Cybersecurity",
    "UI/UX Design",
];

pub const SOCIAL_LINKS: [NavLink; 4] = [
    NavLink {
        name: "Facebook",
        href: "#",
    },
    NavLink {
        name: "Instagram",
        href: "#",
    },
    NavLink {
        name: "Twitter",
        href: "#",
    },
    NavLink {
        name: "LinkedIn",
        href: "#",
    },
];

pub const LEGAL_LINKS: [NavLink; 3] = [
    NavLink {
        name: "Privacy Policy",
        href: "/privacy",
    },
    NavLink {
        name: "Terms of Service",
        href: "/terms",
    },
    NavLink {
        name: "Cookie Policy",
        href: "/cookies",
    },
];

// ============================================================================
// WhatsApp
// ============================================================================

pub const WHATSAPP_PHONE: &str = "+917678245132";
pub const WHATSAPP_GREETING: &str =
    "Hi! I'm interested in your services. Can you please provide more information?";

/// `https://wa.me/<digits>?text=<greeting>`
pub fn whatsapp_link(phone: &str, message: &str) -> Result<Url, url::ParseError> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    Url::parse_with_params(&format!("https://wa.me/{}", digits), &[("text", message)])
}
