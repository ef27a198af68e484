//! Clinic list shipped with the application.

use models::vet::VetClinic;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticVet {
    pub id: i64,
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub website: Option<&'static str>,
    pub map_url: &'static str,
    pub hours: &'static str,
    pub district: &'static str,
    pub rating: f64,
    pub review_count: u32,
    pub services: &'static [&'static str],
}

impl StaticVet {
    /// Live-shaped record: the numeric id moves to `legacy_id`, `id` becomes
    /// `static-<n>`.
    pub fn to_clinic(&self) -> VetClinic {
        VetClinic {
            id: format!("static-{}", self.id),
            legacy_id: Some(self.id),
            name: self.name.to_string(),
            address: self.address.to_string(),
            phone: self.phone.to_string(),
            website: self.website.map(str::to_string),
            map_url: self.map_url.to_string(),
            hours: self.hours.to_string(),
            district: self.district.to_string(),
            rating: self.rating,
            review_count: self.review_count,
            services: self.services.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn remap(records: &[StaticVet]) -> Vec<VetClinic> {
    records.iter().map(StaticVet::to_clinic).collect()
}

pub static STATIC_VETS: &[StaticVet] = &[
    StaticVet {
        id: 1,
        name: "Riverside Animal Hospital",
        address: "12 Riverside Road",
        phone: "02-555-0101",
        website: Some("https://riverside-animal.example"),
        map_url: "https://maps.example/?q=Riverside+Animal+Hospital",
        hours: "Open 24 hours",
        district: "Riverside",
        rating: 4.6,
        review_count: 412,
        services: &["Emergency", "Surgery", "Vaccination"],
    },
    StaticVet {
        id: 2,
        name: "Old Town Cat Clinic",
        address: "88 Market Lane",
        phone: "02-555-0102",
        website: None,
        map_url: "https://maps.example/?q=Old+Town+Cat+Clinic",
        hours: "09:00-20:00",
        district: "Old Town",
        rating: 4.8,
        review_count: 156,
        services: &["Cats only", "Dental", "Vaccination"],
    },
    StaticVet {
        id: 3,
        name: "Green Park Veterinary",
        address: "301 Park Avenue",
        phone: "02-555-0103",
        website: Some("https://greenpark-vet.example"),
        map_url: "https://maps.example/?q=Green+Park+Veterinary",
        hours: "08:00-21:00",
        district: "Green Park",
        rating: 4.3,
        review_count: 98,
        services: &["Neutering", "Microchipping", "Grooming"],
    },
    StaticVet {
        id: 4,
        name: "Harbourside Pet Care",
        address: "5 Quay Street",
        phone: "02-555-0104",
        website: None,
        map_url: "https://maps.example/?q=Harbourside+Pet+Care",
        hours: "10:00-19:00",
        district: "Harbourside",
        rating: 4.1,
        review_count: 63,
        services: &["Vaccination", "Deworming"],
    },
    StaticVet {
        id: 5,
        name: "Riverside Night Vet",
        address: "240 Riverside Road",
        phone: "02-555-0105",
        website: Some("https://riverside-night.example"),
        map_url: "https://maps.example/?q=Riverside+Night+Vet",
        hours: "18:00-08:00",
        district: "Riverside",
        rating: 4.4,
        review_count: 201,
        services: &["Emergency", "X-ray", "Hospitalisation"],
    },
    StaticVet {
        id: 6,
        name: "Hillcrest Small Animal Clinic",
        address: "17 Hillcrest Drive",
        phone: "02-555-0106",
        website: None,
        map_url: "https://maps.example/?q=Hillcrest+Small+Animal+Clinic",
        hours: "09:00-18:00",
        district: "Hillcrest",
        rating: 4.7,
        review_count: 88,
        services: &["Neutering", "Vaccination", "Nutrition"],
    },
];
