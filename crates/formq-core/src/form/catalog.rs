//! Country, state and city tables offered by the visitor form

/// Countries offered by the form, in display order
pub const COUNTRIES: &[&str] = &[
    "India",
    "United States",
    "United Kingdom",
    "Canada",
    "Australia",
    "Other",
];

/// Country preselected on a fresh form
pub const DEFAULT_COUNTRY: &str = "India";

const INDIA_STATES: &[(&str, &[&str])] = &[
    ("Andhra Pradesh", &["Visakhapatnam", "Vijayawada", "Guntur", "Nellore", "Tirupati"]),
    ("Arunachal Pradesh", &["Itanagar", "Naharlagun", "Pasighat"]),
    ("Assam", &["Guwahati", "Dibrugarh", "Silchar", "Jorhat"]),
    ("Bihar", &["Patna", "Gaya", "Bhagalpur", "Muzaffarpur"]),
    ("Chhattisgarh", &["Raipur", "Bilaspur", "Durg", "Korba"]),
    ("Goa", &["Panaji", "Margao", "Vasco da Gama"]),
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar"]),
    ("Haryana", &["Gurugram", "Faridabad", "Panipat", "Hisar"]),
    ("Himachal Pradesh", &["Shimla", "Dharamshala", "Mandi", "Solan"]),
    ("Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro"]),
    ("Karnataka", &["Bengaluru", "Mysuru", "Hubballi", "Mangaluru"]),
    ("Kerala", &["Thiruvananthapuram", "Kochi", "Kozhikode", "Thrissur"]),
    ("Madhya Pradesh", &["Bhopal", "Indore", "Gwalior", "Jabalpur", "Ujjain"]),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Nashik", "Aurangabad"]),
    ("Manipur", &["Imphal", "Thoubal", "Bishnupur"]),
    ("Meghalaya", &["Shillong", "Tura", "Nongpoh"]),
    ("Mizoram", &["Aizawl", "Lunglei", "Champhai"]),
    ("Nagaland", &["Kohima", "Dimapur", "Mokokchung"]),
    ("Odisha", &["Bhubaneswar", "Cuttack", "Rourkela", "Sambalpur"]),
    ("Punjab", &["Amritsar", "Ludhiana", "Jalandhar", "Patiala", "Bathinda"]),
    ("Rajasthan", &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Ajmer"]),
    ("Sikkim", &["Gangtok", "Geyzing", "Namchi"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai", "Tiruchirappalli", "Salem", "Erode"]),
    ("Telangana", &["Hyderabad", "Warangal", "Nizamabad"]),
    ("Tripura", &["Agartala", "Udaipur", "Dharmanagar"]),
    ("Uttar Pradesh", &["Lucknow", "Kanpur", "Agra", "Varanasi", "Ghaziabad", "Meerut", "Noida"]),
    ("Uttarakhand", &["Dehradun", "Haridwar", "Roorkee"]),
    ("West Bengal", &["Kolkata", "Howrah", "Durgapur", "Siliguri", "Asansol"]),
    ("Chandigarh", &["Chandigarh", "New Chandigarh"]),
];

/// States selectable for a country. Only India has a state list.
pub fn states_for(country: &str) -> Vec<&'static str> {
    if country.trim() == DEFAULT_COUNTRY {
        INDIA_STATES.iter().map(|(state, _)| *state).collect()
    } else {
        Vec::new()
    }
}

/// Cities selectable for a state; empty for unknown states
pub fn cities_for(state: &str) -> &'static [&'static str] {
    let state = state.trim();
    INDIA_STATES
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, cities)| *cities)
        .unwrap_or_default()
}
