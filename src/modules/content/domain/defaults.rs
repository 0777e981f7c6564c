//! Hardcoded fallback content, shown until the first snapshot for each
//! section arrives. Readers never observe an "empty" portfolio.

use std::collections::BTreeMap;

use super::entities::{About, Contact, Hero, Stat, Theme};

pub fn initial_about() -> About {
    About {
        title: "Architecting Secure Digital Experiences".to_string(),
        bio: "I am not just a developer; I am a digital architect who bridges the gap \
              between robust engineering and impenetrable security. With expertise \
              spanning the MERN Stack and Java Full Stack ecosystems, I build \
              applications that are not only high-performing but also inherently \
              secure by design."
            .to_string(),
        taglines: vec![
            "Cybersecurity Enthusiast".to_string(),
            "Full Stack Developer".to_string(),
            "Problem Solver".to_string(),
        ],
        profile_image: "/images/profile.png".to_string(),
        stats: vec![
            Stat {
                value: "20+".to_string(),
                label: "Projects Deployed".to_string(),
            },
            Stat {
                value: "100%".to_string(),
                label: "Secure Code".to_string(),
            },
        ],
    }
}

pub fn initial_hero() -> Hero {
    let mut social_links = BTreeMap::new();
    social_links.insert(
        "github".to_string(),
        "https://github.com/crazydhilip02".to_string(),
    );
    social_links.insert(
        "linkedin".to_string(),
        "https://www.linkedin.com/in/dhilipkumar03".to_string(),
    );
    social_links.insert(
        "instagram".to_string(),
        "https://www.instagram.com/crazy_dhilip2/".to_string(),
    );
    social_links.insert("whatsapp".to_string(), "https://wa.me/6374106956".to_string());

    Hero {
        title: "Full Stack Developer".to_string(),
        subtitle: "Architecting Secure Digital Experiences".to_string(),
        description: "I craft secure, elegant code and build cutting-edge applications. \
                      Specializing in full-stack development and system architecture."
            .to_string(),
        social_links,
        resume_link: "#".to_string(),
    }
}

pub fn initial_contact() -> Contact {
    Contact {
        email: "dhilip637410@gmail.com".to_string(),
        phone: "+91 6374106956".to_string(),
        location: "Avadi, Chennai".to_string(),
        whatsapp: "6374106956".to_string(),
        map_link: "#".to_string(),
    }
}

pub fn initial_theme() -> Theme {
    Theme {
        primary: "#00FFFF".to_string(),
        secondary: "#FF00FF".to_string(),
        accent: "#39FF14".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_populated() {
        assert!(!initial_about().taglines.is_empty());
        assert!(initial_hero().social_links.contains_key("github"));
        assert!(!initial_contact().email.is_empty());
        assert_eq!(initial_theme().primary, "#00FFFF");
    }
}
