use serde::{Deserialize, Serialize};

/// English/Bengali label pair carried inside records and catalog entries.
/// Which language is shown is a presentation concern; records keep both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    pub en: String,
    pub bn: String,
}

impl Bilingual {
    pub fn new(en: &str, bn: &str) -> Bilingual {
        Bilingual {
            en: en.to_string(),
            bn: bn.to_string(),
        }
    }

    /// Free-text form input arrives in one language only; both slots get it.
    pub fn same(text: &str) -> Bilingual {
        Bilingual {
            en: text.to_string(),
            bn: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionInfo {
    pub name: Bilingual,
    pub address: Bilingual,
    pub phone: &'static str,
    pub whatsapp: &'static str,
    pub email: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub id: i64,
    pub name: &'static str,
    pub designation: Bilingual,
    pub qualification: Bilingual,
    pub description: Bilingual,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i64,
    pub name: &'static str,
    pub role: Bilingual,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: i64,
    pub text: Bilingual,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: i64,
    pub album: Bilingual,
    pub src: &'static str,
    pub caption: Bilingual,
    pub date: &'static str,
}

pub fn institution_info() -> InstitutionInfo {
    InstitutionInfo {
        name: Bilingual::new("Madrasah Madinatul Uloom", "মাদ্রাসা মদিনাতুল উলূম"),
        address: Bilingual::new(
            "Village: Arampur, Gosaba, South 24 Parganas, West Bengal, India. PIN: 743370",
            "গ্রাম: আরামপুর, গোসাবা, দক্ষিণ ২৪ পরগনা, পশ্চিমবঙ্গ, ভারত। পিন: ৭৪৩৩৭০",
        ),
        phone: "+91 7679116671",
        whatsapp: "https://wa.me/917679116671",
        email: "kcmcentre0@gmail.com",
    }
}

pub fn teachers() -> Vec<TeacherProfile> {
    vec![
        TeacherProfile {
            id: 1,
            name: "Maulana Belal Uddin Mondal",
            designation: Bilingual::new("Muhtamim (Head of Institution)", "মুহতামিম (প্রতিষ্ঠান প্রধান)"),
            qualification: Bilingual::new(
                "M.A. in Arabic, Certified Islamic Scholar",
                "এম.এ. আরবি, প্রত্যয়িত ইসলামী পণ্ডিত",
            ),
            description: Bilingual::new(
                "Founder and Head of Madrasah, teaches Tafsir, Hadith, and Arabic grammar.",
                "মাদ্রাসার প্রতিষ্ঠাতা ও প্রধান, তাফসীর, হাদীস এবং আরবি ব্যাকরণ পড়ান।",
            ),
        },
        TeacherProfile {
            id: 2,
            name: "Hafiz Maulana Sahabuddin Mondal",
            designation: Bilingual::new("President", "সভাপতি"),
            qualification: Bilingual::new("Mufti, Darul Uloom Graduate", "মুফতি, দারুল উলূম স্নাতক"),
            description: Bilingual::new(
                "Supervises all administrative and educational activities.",
                "সমস্ত প্রশাসনিক ও শিক্ষাগত কার্যক্রম তত্ত্বাবধান করেন।",
            ),
        },
        TeacherProfile {
            id: 3,
            name: "Maulana Mohammad Sekh",
            designation: Bilingual::new("Senior Teacher", "সিনিয়র শিক্ষক"),
            qualification: Bilingual::new("M.A. in Arabic Literature", "এম.এ. আরবি সাহিত্য"),
            description: Bilingual::new("Specializes in Fiqh and Balagha.", "ফিকহ ও বালাগাতে বিশেষজ্ঞ।"),
        },
        TeacherProfile {
            id: 4,
            name: "Maulana Joynal Sekh",
            designation: Bilingual::new("Teacher", "শিক্ষক"),
            qualification: Bilingual::new("Alim, Fazil", "আলিম, ফাজিল"),
            description: Bilingual::new(
                "Teaches Arabic and Islamic Studies.",
                "আরবি এবং ইসলামিক স্টাডিজ পড়ান।",
            ),
        },
        TeacherProfile {
            id: 5,
            name: "Hafiz Joynal Abedin",
            designation: Bilingual::new("Teacher", "শিক্ষক"),
            qualification: Bilingual::new("Hafiz-e-Qur’an", "হাফিজ-ই-কুরআন"),
            description: Bilingual::new("Teaches Hifz and Tajweed.", "হিফজ ও তাজবীদ পড়ান।"),
        },
        TeacherProfile {
            id: 6,
            name: "Maulana Rehsan Ali Saheb",
            designation: Bilingual::new("Teacher", "শিক্ষক"),
            qualification: Bilingual::new("Alim", "আলিম"),
            description: Bilingual::new(
                "Teaches basic Arabic, Hadith, and Akhlaq.",
                "মৌলিক আরবি, হাদীস এবং আখলাক পড়ান।",
            ),
        },
        TeacherProfile {
            id: 7,
            name: "Ustadh Hafiz Saiful Sheikh",
            designation: Bilingual::new("Qur’an Teacher", "কুরআন শিক্ষক"),
            qualification: Bilingual::new("Hafiz-e-Qur’an", "হাফিজ-ই-কুরআন"),
            description: Bilingual::new(
                "Dedicated teacher of Hifz section, trains students in correct recitation (Tajweed) and memorization.",
                "হিফজ বিভাগের নিবেদিত শিক্ষক, ছাত্রদের সঠিক তেলাওয়াত (তাজবীদ) এবং মুখস্থে প্রশিক্ষণ দেন।",
            ),
        },
    ]
}

pub fn staff() -> Vec<StaffMember> {
    vec![
        StaffMember {
            id: 1,
            name: "Kowsar Sekh",
            role: Bilingual::new("Office Administrator", "অফিস প্রশাসক"),
        },
        StaffMember {
            id: 2,
            name: "Esar Ali Sekh",
            role: Bilingual::new("Hostel Incharge", "হোস্টেল ইনচার্জ"),
        },
        StaffMember {
            id: 3,
            name: "Joygun Laskar",
            role: Bilingual::new("Cook", "বাবুর্চি"),
        },
        StaffMember {
            id: 4,
            name: "Chabed Molla",
            role: Bilingual::new("Maintenance & Security", "রক্ষণাবেক্ষণ ও নিরাপত্তা"),
        },
        StaffMember {
            id: 5,
            name: "Monajat Laskar",
            role: Bilingual::new("Assistant Worker", "সহকারী কর্মী"),
        },
        StaffMember {
            id: 6,
            name: "Khoter Molla",
            role: Bilingual::new("Staff Member", "কর্মী"),
        },
    ]
}

pub fn notices() -> Vec<Notice> {
    vec![
        Notice {
            id: 1,
            text: Bilingual::new(
                "Annual exams will commence from December 15th, 2025. All students are advised to prepare well.",
                "বার্ষিক পরীক্ষা ১৫ই ডিসেম্বর, ২০২৫ থেকে শুরু হবে। সকল ছাত্রকে ভালোভাবে প্রস্তুতি নেওয়ার পরামর্শ দেওয়া হচ্ছে।",
            ),
        },
        Notice {
            id: 2,
            text: Bilingual::new(
                "The Madrasah will remain closed for Eid-ul-Adha from 10th to 15th of Dhul Hijjah.",
                "ঈদুল আযহা উপলক্ষে মাদ্রাসা যুল হিজ্জার ১০ থেকে ১৫ তারিখ পর্যন্ত বন্ধ থাকবে।",
            ),
        },
        Notice {
            id: 3,
            text: Bilingual::new(
                "Admission for the new academic year is now open. Contact the office for more details.",
                "নতুন শিক্ষাবর্ষের জন্য ভর্তি চলছে। আরও তথ্যের জন্য অফিসে যোগাযোগ করুন।",
            ),
        },
    ]
}

pub fn gallery() -> Vec<GalleryImage> {
    vec![
        GalleryImage {
            id: 1,
            album: Bilingual::new("Annual Function", "বার্ষিক অনুষ্ঠান"),
            src: "https://picsum.photos/800/600?random=1",
            caption: Bilingual::new(
                "Students performing at the annual event.",
                "বার্ষিক অনুষ্ঠানে ছাত্ররা পরিবেশন করছে।",
            ),
            date: "2025-03-20",
        },
        GalleryImage {
            id: 2,
            album: Bilingual::new("Hifz Ceremony", "হিফজ অনুষ্ঠান"),
            src: "https://picsum.photos/800/600?random=2",
            caption: Bilingual::new(
                "Graduating Huffaz receiving their certificates.",
                "স্নাতক হাফেজরা তাদের সনদ গ্রহণ করছে।",
            ),
            date: "2025-05-10",
        },
        GalleryImage {
            id: 3,
            album: Bilingual::new("Student Life", "ছাত্র জীবন"),
            src: "https://picsum.photos/800/600?random=3",
            caption: Bilingual::new("Students in the library.", "লাইব্রেরিতে ছাত্ররা।"),
            date: "2025-02-15",
        },
        GalleryImage {
            id: 4,
            album: Bilingual::new("Campus View", "ক্যাম্পাসের দৃশ্য"),
            src: "https://picsum.photos/800/600?random=4",
            caption: Bilingual::new(
                "A serene view of the Madrasah grounds.",
                "মাদ্রাসার মাঠের একটি নির্মল দৃশ্য।",
            ),
            date: "2025-01-01",
        },
        GalleryImage {
            id: 5,
            album: Bilingual::new("Annual Function", "বার্ষিক অনুষ্ঠান"),
            src: "https://picsum.photos/800/600?random=5",
            caption: Bilingual::new(
                "Guest speaker addressing the audience.",
                "অতিথি বক্তা দর্শকদের উদ্দেশে ভাষণ দিচ্ছেন।",
            ),
            date: "2025-03-20",
        },
        GalleryImage {
            id: 6,
            album: Bilingual::new("Student Life", "ছাত্র জীবন"),
            src: "https://picsum.photos/800/600?random=6",
            caption: Bilingual::new("Daily assembly.", "দৈনিক সমাবেশ।"),
            date: "2025-04-05",
        },
    ]
}

/// Subject catalog seeded into a fresh workspace. Referenced by result marks.
pub fn seed_subjects() -> Vec<(&'static str, Bilingual)> {
    vec![
        ("sub1", Bilingual::new("Qur'an", "কুরআন")),
        ("sub2", Bilingual::new("Hadith", "হাদিস")),
        ("sub3", Bilingual::new("Fiqh", "ফিকহ")),
        ("sub4", Bilingual::new("Arabic Grammar", "আরবি ব্যাকরণ")),
        ("sub5", Bilingual::new("English", "ইংরেজি")),
        ("sub6", Bilingual::new("Mathematics", "গণিত")),
    ]
}
