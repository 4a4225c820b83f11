//! Shorter spellings of long country and US state names
//!
//! Radios show user details on a narrow display, so long names are cut
//! down when the database is built with abbreviation enabled.

use dmrradio_core::users::UserRecord;

const UNITED_STATES: &str = "United States";

const COUNTRIES: &[(&str, &str)] = &[
    ("Bosnia and Hercegovina", "BiH"),
    ("Czech Republic", "Czech Rep."),
    ("Dominican Republic", "Dominican Rep."),
    ("Korea, Republic of", "South Korea"),
    ("Netherlands Antilles", "Neth. Antilles"),
    ("New Zealand", "NZ"),
    ("Russian Federation", "Russia"),
    ("Slovak Republic", "Slovakia"),
    ("South Africa", "ZA"),
    ("Trinidad and Tobago", "Trinidad"),
    ("United Arab Emirates", "UAE"),
    ("United Kingdom", "UK"),
    (UNITED_STATES, "USA"),
];

const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

fn lookup(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(long, _)| long.eq_ignore_ascii_case(name))
        .map(|(_, short)| *short)
}

/// Abbreviate the state and country of `user` in place
pub(crate) fn abbreviate(user: &mut UserRecord) {
    if user.country.eq_ignore_ascii_case(UNITED_STATES) {
        if let Some(short) = lookup(US_STATES, &user.state) {
            user.state = short.to_string();
        }
    }
    if let Some(short) = lookup(COUNTRIES, &user.country) {
        user.country = short.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(state: &str, country: &str) -> UserRecord {
        UserRecord {
            id: 1,
            state: state.into(),
            country: country.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_us_state_and_country() {
        let mut u = user("New York", "United States");
        abbreviate(&mut u);
        assert_eq!(u.state, "NY");
        assert_eq!(u.country, "USA");
    }

    #[test]
    fn test_state_only_abbreviated_in_us() {
        let mut u = user("Georgia", "Georgia");
        abbreviate(&mut u);
        assert_eq!(u.state, "Georgia");
        assert_eq!(u.country, "Georgia");
    }

    #[test]
    fn test_unknown_names_untouched() {
        let mut u = user("Ontario", "Canada");
        abbreviate(&mut u);
        assert_eq!(u, user("Ontario", "Canada"));

        let mut u = user("", "");
        abbreviate(&mut u);
        assert_eq!(u.country, "");
    }
}
