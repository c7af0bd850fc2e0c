//! Fixed class metadata shown on the informational pages.
//!
//! Everything here is `'static` and read-only. The roster doubles as the
//! seed data for the `users` table.

pub struct ClassInfo {
    pub name: &'static str,
    pub full_name: &'static str,
    pub year: &'static str,
    pub total_students: u32,
    pub motto: &'static str,
    pub description: &'static str,
}

pub struct HomeroomTeacher {
    pub name: &'static str,
    pub subject: &'static str,
    pub email: &'static str,
    pub quote: &'static str,
    pub description: &'static str,
}

pub struct Officer {
    pub position: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub struct Division {
    pub name: &'static str,
    pub members: &'static [&'static str],
    pub icon: &'static str,
    pub color: &'static str,
}

/// Class organisation laid out like a network topology: the homeroom
/// teacher at the core, officers around it, divisions at the edge.
pub struct ClassStructure {
    pub core_position: &'static str,
    pub core_name: &'static str,
    pub officers: &'static [Officer],
    pub divisions: &'static [Division],
}

pub struct AlbumImage {
    pub url: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub date: &'static str,
}

pub struct Album {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub images: &'static [AlbumImage],
}

pub struct RosterEntry {
    pub id: i64,
    /// National student number, when known.
    pub external_id: Option<&'static str>,
    pub name: &'static str,
    pub nickname: &'static str,
}

pub static CLASS: ClassInfo = ClassInfo {
    name: "XI TJKT 1",
    full_name: "Kelas XI Teknik Jaringan Komputer dan Telekomunikasi 1",
    year: "2024/2025",
    total_students: 31,
    motto: "Connect, Collaborate, Create",
    description:
        "Kelas yang penuh semangat dalam menguasai teknologi jaringan komputer dan telekomunikasi!",
};

pub static TEACHER: HomeroomTeacher = HomeroomTeacher {
    name: "Bapak/Ibu Wali Kelas",
    subject: "Teknik Jaringan Komputer",
    email: "walikelas@example.com",
    quote: "Belajar dengan tekun, berkarya dengan ikhlas",
    description: "Guru yang berdedikasi tinggi dalam membimbing siswa-siswi XI TJKT 1",
};

pub static STRUCTURE: ClassStructure = ClassStructure {
    core_position: "Wali Kelas",
    core_name: "Bapak/Ibu Wali Kelas",
    officers: &[
        Officer {
            position: "Ketua Kelas",
            name: "Nama Ketua",
            kind: "leader",
            icon: "star",
            color: "purple",
        },
        Officer {
            position: "Wakil Ketua",
            name: "Nama Wakil",
            kind: "leader",
            icon: "shield",
            color: "blue",
        },
        Officer {
            position: "Sekretaris",
            name: "Nama Sekretaris",
            kind: "admin",
            icon: "book",
            color: "green",
        },
        Officer {
            position: "Bendahara",
            name: "Nama Bendahara",
            kind: "admin",
            icon: "wallet",
            color: "yellow",
        },
    ],
    divisions: &[
        Division {
            name: "Divisi Keamanan",
            members: &["Anggota 1", "Anggota 2"],
            icon: "lock",
            color: "red",
        },
        Division {
            name: "Divisi Kebersihan",
            members: &["Anggota 3", "Anggota 4"],
            icon: "broom",
            color: "cyan",
        },
        Division {
            name: "Divisi Acara",
            members: &["Anggota 5", "Anggota 6"],
            icon: "calendar",
            color: "pink",
        },
        Division {
            name: "Divisi Dokumentasi",
            members: &["Anggota 7", "Anggota 8"],
            icon: "camera",
            color: "indigo",
        },
    ],
};

pub static ALBUMS: &[Album] = &[
    Album {
        key: "kegiatan",
        title: "Album Kegiatan Kelas",
        description: "Dokumentasi berbagai kegiatan seru dan pembelajaran kelas XI TJKT 1",
        category: "activities",
        images: &[
            AlbumImage {
                url: "https://images.unsplash.com/photo-1523240795612-9a054b0db644?w=800",
                title: "Belajar Bersama",
                description: "Suasana belajar yang menyenangkan di kelas",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1427504494785-3a9ca7044f45?w=800",
                title: "Diskusi Kelompok",
                description: "Diskusi project jaringan komputer",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1531482615713-2afd69097998?w=800",
                title: "Praktikum Lab",
                description: "Praktikum konfigurasi jaringan di laboratorium",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1522071820081-009f0129c71c?w=800",
                title: "Team Building",
                description: "Kegiatan team building kelas",
                date: "2024",
            },
        ],
    },
    Album {
        key: "praktikum",
        title: "Album Praktikum TJKT",
        description: "Dokumentasi praktikum teknik jaringan dan konfigurasi perangkat",
        category: "practicum",
        images: &[
            AlbumImage {
                url: "https://images.unsplash.com/photo-1558494949-ef010cbdcc31?w=800",
                title: "Konfigurasi Router",
                description: "Praktik konfigurasi router Cisco",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=800",
                title: "Crimping Kabel",
                description: "Praktik crimping kabel UTP",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1573164713988-8665fc963095?w=800",
                title: "Server Management",
                description: "Maintenance dan monitoring server",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1551033406-611cf9a28f67?w=800",
                title: "Network Troubleshooting",
                description: "Troubleshooting masalah jaringan",
                date: "2024",
            },
        ],
    },
    Album {
        key: "acara",
        title: "Album Acara & Event",
        description: "Berbagai acara dan event yang diikuti kelas XI TJKT 1",
        category: "events",
        images: &[
            AlbumImage {
                url: "https://images.unsplash.com/photo-1511578314322-379afb476865?w=800",
                title: "Class Gathering",
                description: "Acara kumpul-kumpul kelas",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1540575467063-178a50c2df87?w=800",
                title: "Kompetisi IT",
                description: "Mengikuti kompetisi IT antar sekolah",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1505373877841-8d25f7d46678?w=800",
                title: "Study Tour",
                description: "Kunjungan ke perusahaan teknologi",
                date: "2024",
            },
            AlbumImage {
                url: "https://images.unsplash.com/photo-1517486808906-6ca8b3f04846?w=800",
                title: "Workshop",
                description: "Workshop teknologi terbaru",
                date: "2024",
            },
        ],
    },
];

const fn student(id: i64, name: &'static str, nickname: &'static str) -> RosterEntry {
    RosterEntry {
        id,
        external_id: None,
        name,
        nickname,
    }
}

pub static ROSTER: &[RosterEntry] = &[
    student(1, "Abdirrohman Maulana Sumantri", "Rohman"),
    student(2, "Abiyyu Zharif", "Abiyyu"),
    student(3, "Ahmad Fauzi", "Fauzi"),
    student(4, "Allysa Margareth Matheos", "Allysa"),
    student(5, "Andika Harsya Pratama", "Andika"),
    student(6, "Andien Qurrotu'aini", "Andien"),
    student(7, "Bintang Abdullah Dzaki Darmawan", "Bintang"),
    student(8, "Denok Estima Sari", "Denok"),
    student(9, "El Rasya Adena Putra", "Rasya"),
    student(10, "Fadliyyah Hubbah", "Fadliyyah"),
    student(11, "Fatih Nubaid Islam", "Fatih"),
    student(12, "Harumi Cahaya Hadis Saputra", "Harumi"),
    student(13, "Hizbul aulia Ananda Fahdrian", "Hizbul"),
    student(14, "Jorge Alvin Alfarezy", "Jorge"),
    student(15, "Kanza Dwi Almirani", "Kanza"),
    student(16, "Muhammad Hilmi Firjatullah Adi", "Hilmi"),
    student(17, "Muhammad Zidan Farhatan", "Zidan"),
    student(18, "Muhamad Farhan", "Farhan"),
    student(19, "Muhammad Ridho Alsyaqif", "Ridho"),
    student(20, "Nabila Carrisa Putri", "Nabila"),
    student(21, "Nadya Shafwah Ramadani", "Nadya"),
    student(22, "Putri Nayla Nuraeni", "Nayla"),
    student(23, "Raka Iqbal Fernanda", "Raka"),
    student(24, "Riangga Pratama", "Riangga"),
    student(25, "Rizky Manna'isya Naruyun", "Rizky"),
    student(26, "Rianti Mulya Sari", "Rianti"),
    student(27, "Saiful Untari Bahtiar", "Saiful"),
    student(28, "Satria dwi Novan", "Satria"),
    student(29, "Vadlan Elka Ramadhan", "Vadlan"),
    student(30, "Vadya Elka Rahmadani", "Vadya"),
    student(31, "Willy Toto Pandy", "Willy"),
];

pub fn album(key: &str) -> Option<&'static Album> {
    ALBUMS.iter().find(|a| a.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_matches_class_size() {
        assert_eq!(ROSTER.len() as u32, CLASS.total_students);
    }

    #[test]
    fn roster_ids_are_unique_and_sequential() {
        for (i, entry) in ROSTER.iter().enumerate() {
            assert_eq!(entry.id, i as i64 + 1);
        }
    }

    #[test]
    fn album_lookup() {
        assert_eq!(album("praktikum").map(|a| a.category), Some("practicum"));
        assert!(album("unknown").is_none());
    }
}
