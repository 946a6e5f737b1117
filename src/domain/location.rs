//! Country selection values backed by a built-in country table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A selected country, as produced by the location picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// ISO 3166-1 alpha-2 code; this is what listings store.
    pub value: String,
    pub label: String,
    pub flag: String,
    pub latlng: [f64; 2],
    pub region: String,
}

// ISO 3166-1 alpha-2 entries plus Kosovo: (code, name, region, lat, lng)
const COUNTRIES: &[(&str, &str, &str, f64, f64)] = &[
    ("AF", "Afghanistan", "Asia", 33.0, 65.0),
    ("AL", "Albania", "Europe", 41.0, 20.0),
    ("DZ", "Algeria", "Africa", 28.0, 3.0),
    ("AS", "American Samoa", "Oceania", -14.33, -170.0),
    ("AD", "Andorra", "Europe", 42.5, 1.5),
    ("AO", "Angola", "Africa", -12.5, 18.5),
    ("AI", "Anguilla", "Americas", 18.25, -63.17),
    ("AQ", "Antarctica", "Antarctic", -90.0, 0.0),
    ("AG", "Antigua and Barbuda", "Americas", 17.05, -61.8),
    ("AR", "Argentina", "Americas", -34.0, -64.0),
    ("AM", "Armenia", "Asia", 40.0, 45.0),
    ("AW", "Aruba", "Americas", 12.5, -69.97),
    ("AU", "Australia", "Oceania", -27.0, 133.0),
    ("AT", "Austria", "Europe", 47.33, 13.33),
    ("AZ", "Azerbaijan", "Asia", 40.5, 47.5),
    ("BS", "Bahamas", "Americas", 24.25, -76.0),
    ("BH", "Bahrain", "Asia", 26.0, 50.55),
    ("BD", "Bangladesh", "Asia", 24.0, 90.0),
    ("BB", "Barbados", "Americas", 13.17, -59.53),
    ("BY", "Belarus", "Europe", 53.0, 28.0),
    ("BE", "Belgium", "Europe", 50.83, 4.0),
    ("BZ", "Belize", "Americas", 17.25, -88.75),
    ("BJ", "Benin", "Africa", 9.5, 2.25),
    ("BM", "Bermuda", "Americas", 32.33, -64.75),
    ("BT", "Bhutan", "Asia", 27.5, 90.5),
    ("BO", "Bolivia", "Americas", -17.0, -65.0),
    ("BA", "Bosnia and Herzegovina", "Europe", 44.0, 18.0),
    ("BW", "Botswana", "Africa", -22.0, 24.0),
    ("BV", "Bouvet Island", "Antarctic", -54.43, 3.4),
    ("BR", "Brazil", "Americas", -10.0, -55.0),
    ("IO", "British Indian Ocean Territory", "Africa", -6.0, 71.5),
    ("VG", "British Virgin Islands", "Americas", 18.43, -64.62),
    ("BN", "Brunei", "Asia", 4.5, 114.67),
    ("BG", "Bulgaria", "Europe", 43.0, 25.0),
    ("BF", "Burkina Faso", "Africa", 13.0, -2.0),
    ("BI", "Burundi", "Africa", -3.5, 30.0),
    ("KH", "Cambodia", "Asia", 13.0, 105.0),
    ("CM", "Cameroon", "Africa", 6.0, 12.0),
    ("CA", "Canada", "Americas", 60.0, -95.0),
    ("CV", "Cape Verde", "Africa", 16.0, -24.0),
    ("BQ", "Caribbean Netherlands", "Americas", 12.18, -68.25),
    ("KY", "Cayman Islands", "Americas", 19.5, -80.5),
    ("CF", "Central African Republic", "Africa", 7.0, 21.0),
    ("TD", "Chad", "Africa", 15.0, 19.0),
    ("CL", "Chile", "Americas", -30.0, -71.0),
    ("CN", "China", "Asia", 35.0, 105.0),
    ("CX", "Christmas Island", "Oceania", -10.5, 105.67),
    ("CC", "Cocos (Keeling) Islands", "Oceania", -12.5, 96.83),
    ("CO", "Colombia", "Americas", 4.0, -72.0),
    ("KM", "Comoros", "Africa", -12.17, 44.25),
    ("CK", "Cook Islands", "Oceania", -21.23, -159.77),
    ("CR", "Costa Rica", "Americas", 10.0, -84.0),
    ("HR", "Croatia", "Europe", 45.17, 15.5),
    ("CU", "Cuba", "Americas", 21.5, -80.0),
    ("CW", "Curaçao", "Americas", 12.12, -68.93),
    ("CY", "Cyprus", "Europe", 35.0, 33.0),
    ("CZ", "Czechia", "Europe", 49.75, 15.5),
    ("CD", "DR Congo", "Africa", 0.0, 25.0),
    ("DK", "Denmark", "Europe", 56.0, 10.0),
    ("DJ", "Djibouti", "Africa", 11.5, 43.0),
    ("DM", "Dominica", "Americas", 15.42, -61.33),
    ("DO", "Dominican Republic", "Americas", 19.0, -70.67),
    ("EC", "Ecuador", "Americas", -2.0, -77.5),
    ("EG", "Egypt", "Africa", 27.0, 30.0),
    ("SV", "El Salvador", "Americas", 13.83, -88.92),
    ("GQ", "Equatorial Guinea", "Africa", 2.0, 10.0),
    ("ER", "Eritrea", "Africa", 15.0, 39.0),
    ("EE", "Estonia", "Europe", 59.0, 26.0),
    ("SZ", "Eswatini", "Africa", -26.5, 31.5),
    ("ET", "Ethiopia", "Africa", 8.0, 38.0),
    ("FK", "Falkland Islands", "Americas", -51.75, -59.0),
    ("FO", "Faroe Islands", "Europe", 62.0, -7.0),
    ("FJ", "Fiji", "Oceania", -18.0, 175.0),
    ("FI", "Finland", "Europe", 64.0, 26.0),
    ("FR", "France", "Europe", 46.0, 2.0),
    ("GF", "French Guiana", "Americas", 4.0, -53.0),
    ("PF", "French Polynesia", "Oceania", -15.0, -140.0),
    ("TF", "French Southern and Antarctic Lands", "Antarctic", -49.25, 69.17),
    ("GA", "Gabon", "Africa", -1.0, 11.75),
    ("GM", "Gambia", "Africa", 13.47, -16.57),
    ("GE", "Georgia", "Asia", 42.0, 43.5),
    ("DE", "Germany", "Europe", 51.0, 9.0),
    ("GH", "Ghana", "Africa", 8.0, -2.0),
    ("GI", "Gibraltar", "Europe", 36.13, -5.35),
    ("GR", "Greece", "Europe", 39.0, 22.0),
    ("GL", "Greenland", "Americas", 72.0, -40.0),
    ("GD", "Grenada", "Americas", 12.12, -61.67),
    ("GP", "Guadeloupe", "Americas", 16.25, -61.58),
    ("GU", "Guam", "Oceania", 13.47, 144.78),
    ("GT", "Guatemala", "Americas", 15.5, -90.25),
    ("GG", "Guernsey", "Europe", 49.47, -2.58),
    ("GN", "Guinea", "Africa", 11.0, -10.0),
    ("GW", "Guinea-Bissau", "Africa", 12.0, -15.0),
    ("GY", "Guyana", "Americas", 5.0, -59.0),
    ("HT", "Haiti", "Americas", 19.0, -72.42),
    ("HM", "Heard Island and McDonald Islands", "Antarctic", -53.1, 72.52),
    ("HN", "Honduras", "Americas", 15.0, -86.5),
    ("HK", "Hong Kong", "Asia", 22.27, 114.19),
    ("HU", "Hungary", "Europe", 47.0, 20.0),
    ("IS", "Iceland", "Europe", 65.0, -18.0),
    ("IN", "India", "Asia", 20.0, 77.0),
    ("ID", "Indonesia", "Asia", -5.0, 120.0),
    ("IR", "Iran", "Asia", 32.0, 53.0),
    ("IQ", "Iraq", "Asia", 33.0, 44.0),
    ("IE", "Ireland", "Europe", 53.0, -8.0),
    ("IM", "Isle of Man", "Europe", 54.25, -4.5),
    ("IL", "Israel", "Asia", 31.47, 35.13),
    ("IT", "Italy", "Europe", 42.83, 12.83),
    ("CI", "Ivory Coast", "Africa", 8.0, -5.0),
    ("JM", "Jamaica", "Americas", 18.25, -77.5),
    ("JP", "Japan", "Asia", 36.0, 138.0),
    ("JE", "Jersey", "Europe", 49.25, -2.17),
    ("JO", "Jordan", "Asia", 31.0, 36.0),
    ("KZ", "Kazakhstan", "Asia", 48.0, 68.0),
    ("KE", "Kenya", "Africa", 1.0, 38.0),
    ("KI", "Kiribati", "Oceania", 1.42, 173.0),
    ("XK", "Kosovo", "Europe", 42.67, 21.17),
    ("KW", "Kuwait", "Asia", 29.5, 45.75),
    ("KG", "Kyrgyzstan", "Asia", 41.0, 75.0),
    ("LA", "Laos", "Asia", 18.0, 105.0),
    ("LV", "Latvia", "Europe", 57.0, 25.0),
    ("LB", "Lebanon", "Asia", 33.83, 35.83),
    ("LS", "Lesotho", "Africa", -29.5, 28.5),
    ("LR", "Liberia", "Africa", 6.5, -9.5),
    ("LY", "Libya", "Africa", 25.0, 17.0),
    ("LI", "Liechtenstein", "Europe", 47.27, 9.53),
    ("LT", "Lithuania", "Europe", 56.0, 24.0),
    ("LU", "Luxembourg", "Europe", 49.75, 6.17),
    ("MO", "Macau", "Asia", 22.17, 113.55),
    ("MG", "Madagascar", "Africa", -20.0, 47.0),
    ("MW", "Malawi", "Africa", -13.5, 34.0),
    ("MY", "Malaysia", "Asia", 2.5, 112.5),
    ("MV", "Maldives", "Asia", 3.25, 73.0),
    ("ML", "Mali", "Africa", 17.0, -4.0),
    ("MT", "Malta", "Europe", 35.83, 14.58),
    ("MH", "Marshall Islands", "Oceania", 9.0, 168.0),
    ("MQ", "Martinique", "Americas", 14.67, -61.0),
    ("MR", "Mauritania", "Africa", 20.0, -12.0),
    ("MU", "Mauritius", "Africa", -20.28, 57.55),
    ("YT", "Mayotte", "Africa", -12.83, 45.17),
    ("MX", "Mexico", "Americas", 23.0, -102.0),
    ("FM", "Micronesia", "Oceania", 6.92, 158.25),
    ("MD", "Moldova", "Europe", 47.0, 29.0),
    ("MC", "Monaco", "Europe", 43.73, 7.4),
    ("MN", "Mongolia", "Asia", 46.0, 105.0),
    ("ME", "Montenegro", "Europe", 42.5, 19.3),
    ("MS", "Montserrat", "Americas", 16.75, -62.2),
    ("MA", "Morocco", "Africa", 32.0, -5.0),
    ("MZ", "Mozambique", "Africa", -18.25, 35.0),
    ("MM", "Myanmar", "Asia", 22.0, 98.0),
    ("NA", "Namibia", "Africa", -22.0, 17.0),
    ("NR", "Nauru", "Oceania", -0.53, 166.92),
    ("NP", "Nepal", "Asia", 28.0, 84.0),
    ("NL", "Netherlands", "Europe", 52.5, 5.75),
    ("NC", "New Caledonia", "Oceania", -21.5, 165.5),
    ("NZ", "New Zealand", "Oceania", -41.0, 174.0),
    ("NI", "Nicaragua", "Americas", 13.0, -85.0),
    ("NE", "Niger", "Africa", 16.0, 8.0),
    ("NG", "Nigeria", "Africa", 10.0, 8.0),
    ("NU", "Niue", "Oceania", -19.03, -169.87),
    ("NF", "Norfolk Island", "Oceania", -29.03, 167.95),
    ("KP", "North Korea", "Asia", 40.0, 127.0),
    ("MK", "North Macedonia", "Europe", 41.83, 22.0),
    ("MP", "Northern Mariana Islands", "Oceania", 15.2, 145.75),
    ("NO", "Norway", "Europe", 62.0, 10.0),
    ("OM", "Oman", "Asia", 21.0, 57.0),
    ("PK", "Pakistan", "Asia", 30.0, 70.0),
    ("PW", "Palau", "Oceania", 7.5, 134.5),
    ("PS", "Palestine", "Asia", 31.9, 35.2),
    ("PA", "Panama", "Americas", 9.0, -80.0),
    ("PG", "Papua New Guinea", "Oceania", -6.0, 147.0),
    ("PY", "Paraguay", "Americas", -23.0, -58.0),
    ("PE", "Peru", "Americas", -10.0, -76.0),
    ("PH", "Philippines", "Asia", 13.0, 122.0),
    ("PN", "Pitcairn Islands", "Oceania", -25.07, -130.1),
    ("PL", "Poland", "Europe", 52.0, 20.0),
    ("PT", "Portugal", "Europe", 39.5, -8.0),
    ("PR", "Puerto Rico", "Americas", 18.25, -66.5),
    ("QA", "Qatar", "Asia", 25.5, 51.25),
    ("CG", "Republic of the Congo", "Africa", -1.0, 15.0),
    ("RO", "Romania", "Europe", 46.0, 25.0),
    ("RU", "Russia", "Europe", 60.0, 100.0),
    ("RW", "Rwanda", "Africa", -2.0, 30.0),
    ("RE", "Réunion", "Africa", -21.15, 55.5),
    ("BL", "Saint Barthélemy", "Americas", 18.5, -63.42),
    ("SH", "Saint Helena, Ascension and Tristan da Cunha", "Africa", -15.95, -5.72),
    ("KN", "Saint Kitts and Nevis", "Americas", 17.33, -62.75),
    ("LC", "Saint Lucia", "Americas", 13.88, -60.97),
    ("MF", "Saint Martin", "Americas", 18.08, -63.95),
    ("PM", "Saint Pierre and Miquelon", "Americas", 46.83, -56.33),
    ("VC", "Saint Vincent and the Grenadines", "Americas", 13.25, -61.2),
    ("WS", "Samoa", "Oceania", -13.58, -172.33),
    ("SM", "San Marino", "Europe", 43.77, 12.42),
    ("SA", "Saudi Arabia", "Asia", 25.0, 45.0),
    ("SN", "Senegal", "Africa", 14.0, -14.0),
    ("RS", "Serbia", "Europe", 44.0, 21.0),
    ("SC", "Seychelles", "Africa", -4.58, 55.67),
    ("SL", "Sierra Leone", "Africa", 8.5, -11.5),
    ("SG", "Singapore", "Asia", 1.37, 103.8),
    ("SX", "Sint Maarten", "Americas", 18.03, -63.05),
    ("SK", "Slovakia", "Europe", 48.67, 19.5),
    ("SI", "Slovenia", "Europe", 46.12, 14.82),
    ("SB", "Solomon Islands", "Oceania", -8.0, 159.0),
    ("SO", "Somalia", "Africa", 10.0, 49.0),
    ("ZA", "South Africa", "Africa", -29.0, 24.0),
    ("GS", "South Georgia", "Antarctic", -54.5, -37.0),
    ("KR", "South Korea", "Asia", 37.0, 127.5),
    ("SS", "South Sudan", "Africa", 7.0, 30.0),
    ("ES", "Spain", "Europe", 40.0, -4.0),
    ("LK", "Sri Lanka", "Asia", 7.0, 81.0),
    ("SD", "Sudan", "Africa", 15.0, 30.0),
    ("SR", "Suriname", "Americas", 4.0, -56.0),
    ("SJ", "Svalbard and Jan Mayen", "Europe", 78.0, 20.0),
    ("SE", "Sweden", "Europe", 62.0, 15.0),
    ("CH", "Switzerland", "Europe", 47.0, 8.0),
    ("SY", "Syria", "Asia", 35.0, 38.0),
    ("ST", "São Tomé and Príncipe", "Africa", 1.0, 7.0),
    ("TW", "Taiwan", "Asia", 23.5, 121.0),
    ("TJ", "Tajikistan", "Asia", 39.0, 71.0),
    ("TZ", "Tanzania", "Africa", -6.0, 35.0),
    ("TH", "Thailand", "Asia", 15.0, 100.0),
    ("TL", "Timor-Leste", "Asia", -8.83, 125.92),
    ("TG", "Togo", "Africa", 8.0, 1.17),
    ("TK", "Tokelau", "Oceania", -9.0, -172.0),
    ("TO", "Tonga", "Oceania", -20.0, -175.0),
    ("TT", "Trinidad and Tobago", "Americas", 11.0, -61.0),
    ("TN", "Tunisia", "Africa", 34.0, 9.0),
    ("TR", "Turkey", "Asia", 39.0, 35.0),
    ("TM", "Turkmenistan", "Asia", 40.0, 60.0),
    ("TC", "Turks and Caicos Islands", "Americas", 21.75, -71.58),
    ("TV", "Tuvalu", "Oceania", -8.0, 178.0),
    ("UG", "Uganda", "Africa", 1.0, 32.0),
    ("UA", "Ukraine", "Europe", 49.0, 32.0),
    ("AE", "United Arab Emirates", "Asia", 24.0, 54.0),
    ("GB", "United Kingdom", "Europe", 54.0, -2.0),
    ("US", "United States", "Americas", 38.0, -97.0),
    ("UM", "United States Minor Outlying Islands", "Americas", 19.3, 166.63),
    ("VI", "United States Virgin Islands", "Americas", 18.35, -64.93),
    ("UY", "Uruguay", "Americas", -33.0, -56.0),
    ("UZ", "Uzbekistan", "Asia", 41.0, 64.0),
    ("VU", "Vanuatu", "Oceania", -16.0, 167.0),
    ("VA", "Vatican City", "Europe", 41.9, 12.45),
    ("VE", "Venezuela", "Americas", 8.0, -66.0),
    ("VN", "Vietnam", "Asia", 16.17, 107.83),
    ("WF", "Wallis and Futuna", "Oceania", -13.3, -176.2),
    ("EH", "Western Sahara", "Africa", 24.5, -13.0),
    ("YE", "Yemen", "Asia", 15.0, 48.0),
    ("ZM", "Zambia", "Africa", -15.0, 30.0),
    ("ZW", "Zimbabwe", "Africa", -20.0, 30.0),
    ("AX", "Åland Islands", "Europe", 60.12, 19.9),
];

impl Location {
    /// Resolves a country by ISO code or by name, ignoring case.
    pub fn lookup(query: &str) -> Option<Location> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        COUNTRIES
            .iter()
            .find(|(code, name, ..)| {
                code.eq_ignore_ascii_case(query) || name.eq_ignore_ascii_case(query)
            })
            .map(|&(code, name, region, lat, lng)| Location {
                value: code.to_string(),
                label: name.to_string(),
                flag: flag_for(code),
                latlng: [lat, lng],
                region: region.to_string(),
            })
    }

    /// Every known country, in table order.
    pub fn all() -> Vec<Location> {
        COUNTRIES
            .iter()
            .filter_map(|(code, ..)| Location::lookup(code))
            .collect()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.flag, self.label, self.region)
    }
}

/// Regional-indicator emoji for a two-letter country code.
fn flag_for(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .filter_map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code_and_name() {
        let by_code = Location::lookup("pt").expect("portugal");
        let by_name = Location::lookup("Portugal").expect("portugal");
        assert_eq!(by_code, by_name);
        assert_eq!(by_code.value, "PT");
        assert_eq!(by_code.region, "Europe");
        assert_eq!(by_code.flag, "🇵🇹");
    }

    #[test]
    fn unknown_country_is_none() {
        assert!(Location::lookup("Atlantis").is_none());
        assert!(Location::lookup("  ").is_none());
    }

    #[test]
    fn all_covers_the_table() {
        assert_eq!(Location::all().len(), COUNTRIES.len());
        assert!(COUNTRIES.len() >= 249);
        let mut codes: Vec<&str> = COUNTRIES.iter().map(|(code, ..)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), COUNTRIES.len());
    }

    #[test]
    fn smaller_destinations_resolve() {
        let singapore = Location::lookup("Singapore").expect("singapore");
        assert_eq!(singapore.value, "SG");
        assert_eq!(singapore.region, "Asia");
        assert_eq!(Location::lookup("philippines").map(|l| l.value).as_deref(), Some("PH"));
        let costa_rica = Location::lookup("CR").expect("costa rica");
        assert_eq!(costa_rica.label, "Costa Rica");
        assert_eq!(costa_rica.region, "Americas");
        assert_eq!(costa_rica.flag, "🇨🇷");
    }
}
