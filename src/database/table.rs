// src/database/table.rs

/// Standard setting of one space-group type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingRecord {
    pub number: i32,
    pub hall_number: i32,
    pub hall_symbol: &'static str,
    pub international: &'static str,
    pub international_full: &'static str,
    /// "b"/"b1" unique axis and cell choice, "1" origin choice, "H" hexagonal axes
    pub setting: &'static str,
}

macro_rules! sg {
    ($num:expr, $hall:expr, $sym:expr, $short:expr, $full:expr, $setting:expr) => {
        SettingRecord {
            number: $num,
            hall_number: $hall,
            hall_symbol: $sym,
            international: $short,
            international_full: $full,
            setting: $setting,
        }
    };
}

// === STANDARD SETTINGS (one per type, canonical order) ===

pub static SETTINGS: [SettingRecord; 230] = [
    sg!(1, 1, "P 1", "P1", "P 1", ""),
    sg!(2, 2, "-P 1", "P-1", "P -1", ""),
    sg!(3, 3, "P 2y", "P2", "P 1 2 1", "b"),
    sg!(4, 6, "P 2yb", "P2_1", "P 1 2_1 1", "b"),
    sg!(5, 9, "C 2y", "C2", "C 1 2 1", "b1"),
    sg!(6, 18, "P -2y", "Pm", "P 1 m 1", "b"),
    sg!(7, 21, "P -2yc", "Pc", "P 1 c 1", "b1"),
    sg!(8, 30, "C -2y", "Cm", "C 1 m 1", "b1"),
    sg!(9, 39, "C -2yc", "Cc", "C 1 c 1", "b1"),
    sg!(10, 57, "-P 2y", "P2/m", "P 1 2/m 1", "b"),
    sg!(11, 60, "-P 2yb", "P2_1/m", "P 1 2_1/m 1", "b"),
    sg!(12, 63, "-C 2y", "C2/m", "C 1 2/m 1", "b1"),
    sg!(13, 72, "-P 2yc", "P2/c", "P 1 2/c 1", "b1"),
    sg!(14, 81, "-P 2ybc", "P2_1/c", "P 1 2_1/c 1", "b1"),
    sg!(15, 90, "-C 2yc", "C2/c", "C 1 2/c 1", "b1"),
    sg!(16, 108, "P 2 2", "P222", "P 2 2 2", ""),
    sg!(17, 109, "P 2c 2", "P222_1", "P 2 2 2_1", ""),
    sg!(18, 112, "P 2 2ab", "P2_12_12", "P 2_1 2_1 2", ""),
    sg!(19, 115, "P 2ac 2ab", "P2_12_12_1", "P 2_1 2_1 2_1", ""),
    sg!(20, 116, "C 2c 2", "C222_1", "C 2 2 2_1", ""),
    sg!(21, 119, "C 2 2", "C222", "C 2 2 2", ""),
    sg!(22, 122, "F 2 2", "F222", "F 2 2 2", ""),
    sg!(23, 123, "I 2 2", "I222", "I 2 2 2", ""),
    sg!(24, 124, "I 2b 2c", "I2_12_12_1", "I 2_1 2_1 2_1", ""),
    sg!(25, 125, "P 2 -2", "Pmm2", "P m m 2", ""),
    sg!(26, 128, "P 2c -2", "Pmc2_1", "P m c 2_1", ""),
    sg!(27, 134, "P 2 -2c", "Pcc2", "P c c 2", ""),
    sg!(28, 137, "P 2 -2a", "Pma2", "P m a 2", ""),
    sg!(29, 143, "P 2c -2ac", "Pca2_1", "P c a 2_1", ""),
    sg!(30, 149, "P 2 -2bc", "Pnc2", "P n c 2", ""),
    sg!(31, 155, "P 2ac -2", "Pmn2_1", "P m n 2_1", ""),
    sg!(32, 161, "P 2 -2ab", "Pba2", "P b a 2", ""),
    sg!(33, 164, "P 2c -2n", "Pna2_1", "P n a 2_1", ""),
    sg!(34, 170, "P 2 -2n", "Pnn2", "P n n 2", ""),
    sg!(35, 173, "C 2 -2", "Cmm2", "C m m 2", ""),
    sg!(36, 176, "C 2c -2", "Cmc2_1", "C m c 2_1", ""),
    sg!(37, 182, "C 2 -2c", "Ccc2", "C c c 2", ""),
    sg!(38, 185, "A 2 -2", "Amm2", "A m m 2", ""),
    sg!(39, 191, "A 2 -2c", "Aem2", "A e m 2", ""),
    sg!(40, 197, "A 2 -2a", "Ama2", "A m a 2", ""),
    sg!(41, 203, "A 2 -2ac", "Aea2", "A e a 2", ""),
    sg!(42, 209, "F 2 -2", "Fmm2", "F m m 2", ""),
    sg!(43, 212, "F 2 -2d", "Fdd2", "F d d 2", ""),
    sg!(44, 215, "I 2 -2", "Imm2", "I m m 2", ""),
    sg!(45, 218, "I 2 -2c", "Iba2", "I b a 2", ""),
    sg!(46, 221, "I 2 -2a", "Ima2", "I m a 2", ""),
    sg!(47, 227, "-P 2 2", "Pmmm", "P 2/m 2/m 2/m", ""),
    sg!(48, 228, "P 2 2 -1n", "Pnnn", "P 2/n 2/n 2/n", "1"),
    sg!(49, 230, "-P 2 2c", "Pccm", "P 2/c 2/c 2/m", ""),
    sg!(50, 233, "P 2 2 -1ab", "Pban", "P 2/b 2/a 2/n", "1"),
    sg!(51, 239, "-P 2a 2a", "Pmma", "P 2_1/m 2/m 2/a", ""),
    sg!(52, 245, "-P 2a 2bc", "Pnna", "P 2/n 2_1/n 2/a", ""),
    sg!(53, 251, "-P 2ac 2", "Pmna", "P 2/m 2/n 2_1/a", ""),
    sg!(54, 257, "-P 2a 2ac", "Pcca", "P 2_1/c 2/c 2/a", ""),
    sg!(55, 263, "-P 2 2ab", "Pbam", "P 2_1/b 2_1/a 2/m", ""),
    sg!(56, 266, "-P 2ab 2ac", "Pccn", "P 2_1/c 2_1/c 2/n", ""),
    sg!(57, 269, "-P 2c 2b", "Pbcm", "P 2/b 2_1/c 2_1/m", ""),
    sg!(58, 275, "-P 2 2n", "Pnnm", "P 2_1/n 2_1/n 2/m", ""),
    sg!(59, 278, "P 2 2ab -1ab", "Pmmn", "P 2_1/m 2_1/m 2/n", "1"),
    sg!(60, 284, "-P 2n 2ab", "Pbcn", "P 2_1/b 2/c 2_1/n", ""),
    sg!(61, 290, "-P 2ac 2ab", "Pbca", "P 2_1/b 2_1/c 2_1/a", ""),
    sg!(62, 292, "-P 2ac 2n", "Pnma", "P 2_1/n 2_1/m 2_1/a", ""),
    sg!(63, 298, "-C 2c 2", "Cmcm", "C 2/m 2/c 2_1/m", ""),
    sg!(64, 304, "-C 2ac 2", "Cmce", "C 2/m 2/c 2_1/e", ""),
    sg!(65, 310, "-C 2 2", "Cmmm", "C 2/m 2/m 2/m", ""),
    sg!(66, 313, "-C 2 2c", "Cccm", "C 2/c 2/c 2/m", ""),
    sg!(67, 316, "-C 2b 2", "Cmme", "C 2/m 2/m 2/e", ""),
    sg!(68, 322, "C 2 2 -1bc", "Ccce", "C 2/c 2/c 2/e", "1"),
    sg!(69, 334, "-F 2 2", "Fmmm", "F 2/m 2/m 2/m", ""),
    sg!(70, 335, "F 2 2 -1d", "Fddd", "F 2/d 2/d 2/d", "1"),
    sg!(71, 337, "-I 2 2", "Immm", "I 2/m 2/m 2/m", ""),
    sg!(72, 338, "-I 2 2c", "Ibam", "I 2/b 2/a 2/m", ""),
    sg!(73, 341, "-I 2b 2c", "Ibca", "I 2_1/b 2_1/c 2_1/a", ""),
    sg!(74, 343, "-I 2b 2", "Imma", "I 2_1/m 2_1/m 2_1/a", ""),
    sg!(75, 349, "P 4", "P4", "P 4", ""),
    sg!(76, 350, "P 4w", "P4_1", "P 4_1", ""),
    sg!(77, 351, "P 4c", "P4_2", "P 4_2", ""),
    sg!(78, 352, "P 4cw", "P4_3", "P 4_3", ""),
    sg!(79, 353, "I 4", "I4", "I 4", ""),
    sg!(80, 354, "I 4bw", "I4_1", "I 4_1", ""),
    sg!(81, 355, "P -4", "P-4", "P -4", ""),
    sg!(82, 356, "I -4", "I-4", "I -4", ""),
    sg!(83, 357, "-P 4", "P4/m", "P 4/m", ""),
    sg!(84, 358, "-P 4c", "P4_2/m", "P 4_2/m", ""),
    sg!(85, 359, "P 4ab -1ab", "P4/n", "P 4/n", "1"),
    sg!(86, 361, "P 4n -1n", "P4_2/n", "P 4_2/n", "1"),
    sg!(87, 363, "-I 4", "I4/m", "I 4/m", ""),
    sg!(88, 364, "I 4bw -1bw", "I4_1/a", "I 4_1/a", "1"),
    sg!(89, 366, "P 4 2", "P422", "P 4 2 2", ""),
    sg!(90, 367, "P 4ab 2ab", "P42_12", "P 4 2_1 2", ""),
    sg!(91, 368, "P 4w 2c", "P4_122", "P 4_1 2 2", ""),
    sg!(92, 369, "P 4abw 2nw", "P4_12_12", "P 4_1 2_1 2", ""),
    sg!(93, 370, "P 4c 2", "P4_222", "P 4_2 2 2", ""),
    sg!(94, 371, "P 4n 2n", "P4_22_12", "P 4_2 2_1 2", ""),
    sg!(95, 372, "P 4cw 2c", "P4_322", "P 4_3 2 2", ""),
    sg!(96, 373, "P 4nw 2abw", "P4_32_12", "P 4_3 2_1 2", ""),
    sg!(97, 374, "I 4 2", "I422", "I 4 2 2", ""),
    sg!(98, 375, "I 4bw 2bw", "I4_122", "I 4_1 2 2", ""),
    sg!(99, 376, "P 4 -2", "P4mm", "P 4 m m", ""),
    sg!(100, 377, "P 4 -2ab", "P4bm", "P 4 b m", ""),
    sg!(101, 378, "P 4c -2c", "P4_2cm", "P 4_2 c m", ""),
    sg!(102, 379, "P 4n -2n", "P4_2nm", "P 4_2 n m", ""),
    sg!(103, 380, "P 4 -2c", "P4cc", "P 4 c c", ""),
    sg!(104, 381, "P 4 -2n", "P4nc", "P 4 n c", ""),
    sg!(105, 382, "P 4c -2", "P4_2mc", "P 4_2 m c", ""),
    sg!(106, 383, "P 4c -2ab", "P4_2bc", "P 4_2 b c", ""),
    sg!(107, 384, "I 4 -2", "I4mm", "I 4 m m", ""),
    sg!(108, 385, "I 4 -2c", "I4cm", "I 4 c m", ""),
    sg!(109, 386, "I 4bw -2", "I4_1md", "I 4_1 m d", ""),
    sg!(110, 387, "I 4bw -2c", "I4_1cd", "I 4_1 c d", ""),
    sg!(111, 388, "P -4 2", "P-42m", "P -4 2 m", ""),
    sg!(112, 389, "P -4 2c", "P-42c", "P -4 2 c", ""),
    sg!(113, 390, "P -4 2ab", "P-42_1m", "P -4 2_1 m", ""),
    sg!(114, 391, "P -4 2n", "P-42_1c", "P -4 2_1 c", ""),
    sg!(115, 392, "P -4 -2", "P-4m2", "P -4 m 2", ""),
    sg!(116, 393, "P -4 -2c", "P-4c2", "P -4 c 2", ""),
    sg!(117, 394, "P -4 -2ab", "P-4b2", "P -4 b 2", ""),
    sg!(118, 395, "P -4 -2n", "P-4n2", "P -4 n 2", ""),
    sg!(119, 396, "I -4 -2", "I-4m2", "I -4 m 2", ""),
    sg!(120, 397, "I -4 -2c", "I-4c2", "I -4 c 2", ""),
    sg!(121, 398, "I -4 2", "I-42m", "I -4 2 m", ""),
    sg!(122, 399, "I -4 2bw", "I-42d", "I -4 2 d", ""),
    sg!(123, 400, "-P 4 2", "P4/mmm", "P 4/m 2/m 2/m", ""),
    sg!(124, 401, "-P 4 2c", "P4/mcc", "P 4/m 2/c 2/c", ""),
    sg!(125, 402, "P 4 2 -1ab", "P4/nbm", "P 4/n 2/b 2/m", "1"),
    sg!(126, 404, "P 4 2 -1n", "P4/nnc", "P 4/n 2/n 2/c", "1"),
    sg!(127, 406, "-P 4 2ab", "P4/mbm", "P 4/m 2_1/b 2/m", ""),
    sg!(128, 407, "-P 4 2n", "P4/mnc", "P 4/m 2_1/n 2/c", ""),
    sg!(129, 408, "P 4ab 2ab -1ab", "P4/nmm", "P 4/n 2_1/m 2/m", "1"),
    sg!(130, 410, "P 4ab 2n -1ab", "P4/ncc", "P 4/n 2_1/c 2/c", "1"),
    sg!(131, 412, "-P 4c 2", "P4_2/mmc", "P 4_2/m 2/m 2/c", ""),
    sg!(132, 413, "-P 4c 2c", "P4_2/mcm", "P 4_2/m 2/c 2/m", ""),
    sg!(133, 414, "P 4n 2c -1n", "P4_2/nbc", "P 4_2/n 2/b 2/c", "1"),
    sg!(134, 416, "P 4n 2 -1n", "P4_2/nnm", "P 4_2/n 2/n 2/m", "1"),
    sg!(135, 418, "-P 4c 2ab", "P4_2/mbc", "P 4_2/m 2_1/b 2/c", ""),
    sg!(136, 419, "-P 4n 2n", "P4_2/mnm", "P 4_2/m 2_1/n 2/m", ""),
    sg!(137, 420, "P 4n 2n -1n", "P4_2/nmc", "P 4_2/n 2_1/m 2/c", "1"),
    sg!(138, 422, "P 4n 2ab -1n", "P4_2/ncm", "P 4_2/n 2_1/c 2/m", "1"),
    sg!(139, 424, "-I 4 2", "I4/mmm", "I 4/m 2/m 2/m", ""),
    sg!(140, 425, "-I 4 2c", "I4/mcm", "I 4/m 2/c 2/m", ""),
    sg!(141, 426, "I 4bw 2bw -1bw", "I4_1/amd", "I 4_1/a 2/m 2/d", "1"),
    sg!(142, 428, "I 4bw 2aw -1bw", "I4_1/acd", "I 4_1/a 2/c 2/d", "1"),
    sg!(143, 430, "P 3", "P3", "P 3", ""),
    sg!(144, 431, "P 31", "P3_1", "P 3_1", ""),
    sg!(145, 432, "P 32", "P3_2", "P 3_2", ""),
    sg!(146, 433, "R 3", "R3", "R 3", "H"),
    sg!(147, 435, "-P 3", "P-3", "P -3", ""),
    sg!(148, 436, "-R 3", "R-3", "R -3", "H"),
    sg!(149, 438, "P 3 2", "P312", "P 3 1 2", ""),
    sg!(150, 439, "P 3 2\"", "P321", "P 3 2 1", ""),
    sg!(151, 440, "P 31 2c (0 0 1)", "P3_112", "P 3_1 1 2", ""),
    sg!(152, 441, "P 31 2\"", "P3_121", "P 3_1 2 1", ""),
    sg!(153, 442, "P 32 2c (0 0 -1)", "P3_212", "P 3_2 1 2", ""),
    sg!(154, 443, "P 32 2\"", "P3_221", "P 3_2 2 1", ""),
    sg!(155, 444, "R 3 2\"", "R32", "R 3 2", "H"),
    sg!(156, 446, "P 3 -2\"", "P3m1", "P 3 m 1", ""),
    sg!(157, 447, "P 3 -2", "P31m", "P 3 1 m", ""),
    sg!(158, 448, "P 3 -2\"c", "P3c1", "P 3 c 1", ""),
    sg!(159, 449, "P 3 -2c", "P31c", "P 3 1 c", ""),
    sg!(160, 450, "R 3 -2\"", "R3m", "R 3 m", "H"),
    sg!(161, 452, "R 3 -2\"c", "R3c", "R 3 c", "H"),
    sg!(162, 454, "-P 3 2", "P-31m", "P -3 1 2/m", ""),
    sg!(163, 455, "-P 3 2c", "P-31c", "P -3 1 2/c", ""),
    sg!(164, 456, "-P 3 2\"", "P-3m1", "P -3 2/m 1", ""),
    sg!(165, 457, "-P 3 2\"c", "P-3c1", "P -3 2/c 1", ""),
    sg!(166, 458, "-R 3 2\"", "R-3m", "R -3 2/m", "H"),
    sg!(167, 460, "-R 3 2\"c", "R-3c", "R -3 2/c", "H"),
    sg!(168, 462, "P 6", "P6", "P 6", ""),
    sg!(169, 463, "P 61", "P6_1", "P 6_1", ""),
    sg!(170, 464, "P 65", "P6_5", "P 6_5", ""),
    sg!(171, 465, "P 62", "P6_2", "P 6_2", ""),
    sg!(172, 466, "P 64", "P6_4", "P 6_4", ""),
    sg!(173, 467, "P 6c", "P6_3", "P 6_3", ""),
    sg!(174, 468, "P -6", "P-6", "P -6", ""),
    sg!(175, 469, "-P 6", "P6/m", "P 6/m", ""),
    sg!(176, 470, "-P 6c", "P6_3/m", "P 6_3/m", ""),
    sg!(177, 471, "P 6 2", "P622", "P 6 2 2", ""),
    sg!(178, 472, "P 61 2 (0 0 -1)", "P6_122", "P 6_1 2 2", ""),
    sg!(179, 473, "P 65 2 (0 0 1)", "P6_522", "P 6_5 2 2", ""),
    sg!(180, 474, "P 62 2c (0 0 1)", "P6_222", "P 6_2 2 2", ""),
    sg!(181, 475, "P 64 2c (0 0 -1)", "P6_422", "P 6_4 2 2", ""),
    sg!(182, 476, "P 6c 2c", "P6_322", "P 6_3 2 2", ""),
    sg!(183, 477, "P 6 -2", "P6mm", "P 6 m m", ""),
    sg!(184, 478, "P 6 -2c", "P6cc", "P 6 c c", ""),
    sg!(185, 479, "P 6c -2", "P6_3cm", "P 6_3 c m", ""),
    sg!(186, 480, "P 6c -2c", "P6_3mc", "P 6_3 m c", ""),
    sg!(187, 481, "P -6 2", "P-6m2", "P -6 m 2", ""),
    sg!(188, 482, "P -6c 2", "P-6c2", "P -6 c 2", ""),
    sg!(189, 483, "P -6 -2", "P-62m", "P -6 2 m", ""),
    sg!(190, 484, "P -6c -2c", "P-62c", "P -6 2 c", ""),
    sg!(191, 485, "-P 6 2", "P6/mmm", "P 6/m 2/m 2/m", ""),
    sg!(192, 486, "-P 6 2c", "P6/mcc", "P 6/m 2/c 2/c", ""),
    sg!(193, 487, "-P 6c 2", "P6_3/mcm", "P 6_3/m 2/c 2/m", ""),
    sg!(194, 488, "-P 6c 2c", "P6_3/mmc", "P 6_3/m 2/m 2/c", ""),
    sg!(195, 489, "P 2 2 3", "P23", "P 2 3", ""),
    sg!(196, 490, "F 2 2 3", "F23", "F 2 3", ""),
    sg!(197, 491, "I 2 2 3", "I23", "I 2 3", ""),
    sg!(198, 492, "P 2ac 2ab 3", "P2_13", "P 2_1 3", ""),
    sg!(199, 493, "I 2b 2c 3", "I2_13", "I 2_1 3", ""),
    sg!(200, 494, "-P 2 2 3", "Pm-3", "P 2/m -3", ""),
    sg!(201, 495, "P 2 2 3 -1n", "Pn-3", "P 2/n -3", "1"),
    sg!(202, 497, "-F 2 2 3", "Fm-3", "F 2/m -3", ""),
    sg!(203, 498, "F 2 2 3 -1d", "Fd-3", "F 2/d -3", "1"),
    sg!(204, 500, "-I 2 2 3", "Im-3", "I 2/m -3", ""),
    sg!(205, 501, "-P 2ac 2ab 3", "Pa-3", "P 2_1/a -3", ""),
    sg!(206, 502, "-I 2b 2c 3", "Ia-3", "I 2_1/a -3", ""),
    sg!(207, 503, "P 4 2 3", "P432", "P 4 3 2", ""),
    sg!(208, 504, "P 4n 2 3", "P4_232", "P 4_2 3 2", ""),
    sg!(209, 505, "F 4 2 3", "F432", "F 4 3 2", ""),
    sg!(210, 506, "F 4d 2 3", "F4_132", "F 4_1 3 2", ""),
    sg!(211, 507, "I 4 2 3", "I432", "I 4 3 2", ""),
    sg!(212, 508, "P 4acd 2ab 3", "P4_332", "P 4_3 3 2", ""),
    sg!(213, 509, "P 4bd 2ab 3", "P4_132", "P 4_1 3 2", ""),
    sg!(214, 510, "I 4bd 2c 3", "I4_132", "I 4_1 3 2", ""),
    sg!(215, 511, "P -4 2 3", "P-43m", "P -4 3 m", ""),
    sg!(216, 512, "F -4 2 3", "F-43m", "F -4 3 m", ""),
    sg!(217, 513, "I -4 2 3", "I-43m", "I -4 3 m", ""),
    sg!(218, 514, "P -4n 2 3", "P-43n", "P -4 3 n", ""),
    sg!(219, 515, "F -4c 2 3", "F-43c", "F -4 3 c", ""),
    sg!(220, 516, "I -4bd 2c 3", "I-43d", "I -4 3 d", ""),
    sg!(221, 517, "-P 4 2 3", "Pm-3m", "P 4/m -3 2/m", ""),
    sg!(222, 518, "P 4 2 3 -1n", "Pn-3n", "P 4/n -3 2/n", "1"),
    sg!(223, 520, "-P 4n 2 3", "Pm-3n", "P 4_2/m -3 2/n", ""),
    sg!(224, 521, "P 4n 2 3 -1n", "Pn-3m", "P 4_2/n -3 2/m", "1"),
    sg!(225, 523, "-F 4 2 3", "Fm-3m", "F 4/m -3 2/m", ""),
    sg!(226, 524, "-F 4c 2 3", "Fm-3c", "F 4/m -3 2/c", ""),
    sg!(227, 525, "F 4d 2 3 -1d", "Fd-3m", "F 4_1/d -3 2/m", "1"),
    sg!(228, 527, "F 4d 2 3 -1ad", "Fd-3c", "F 4_1/d -3 2/c", "1"),
    sg!(229, 529, "-I 4 2 3", "Im-3m", "I 4/m -3 2/m", ""),
    sg!(230, 530, "-I 4bd 2c 3", "Ia-3d", "I 4_1/a -3 2/d", ""),
];

/// Space-group number ranges per point group (Schoenflies symbols are numbered
/// within each range)
static POINT_GROUP_RANGES: [(i32, i32, &str, &str); 32] = [
    (1, 1, "1", "C1"),
    (2, 2, "-1", "Ci"),
    (3, 5, "2", "C2"),
    (6, 9, "m", "Cs"),
    (10, 15, "2/m", "C2h"),
    (16, 24, "222", "D2"),
    (25, 46, "mm2", "C2v"),
    (47, 74, "mmm", "D2h"),
    (75, 80, "4", "C4"),
    (81, 82, "-4", "S4"),
    (83, 88, "4/m", "C4h"),
    (89, 98, "422", "D4"),
    (99, 110, "4mm", "C4v"),
    (111, 122, "-42m", "D2d"),
    (123, 142, "4/mmm", "D4h"),
    (143, 146, "3", "C3"),
    (147, 148, "-3", "C3i"),
    (149, 155, "32", "D3"),
    (156, 161, "3m", "C3v"),
    (162, 167, "-3m", "D3d"),
    (168, 173, "6", "C6"),
    (174, 174, "-6", "C3h"),
    (175, 176, "6/m", "C6h"),
    (177, 182, "622", "D6"),
    (183, 186, "6mm", "C6v"),
    (187, 190, "-6m2", "D3h"),
    (191, 194, "6/mmm", "D6h"),
    (195, 199, "23", "T"),
    (200, 206, "m-3", "Th"),
    (207, 214, "432", "O"),
    (215, 220, "-43m", "Td"),
    (221, 230, "m-3m", "Oh"),
];

pub fn setting(number: i32) -> Option<&'static SettingRecord> {
    if !(1..=230).contains(&number) {
        return None;
    }
    SETTINGS.get((number - 1) as usize)
}

pub fn setting_by_hall_number(hall_number: i32) -> Option<&'static SettingRecord> {
    SETTINGS
        .binary_search_by_key(&hall_number, |s| s.hall_number)
        .ok()
        .map(|i| &SETTINGS[i])
}

/// Point-group symbol of a space-group type
pub fn pointgroup_symbol(number: i32) -> Option<&'static str> {
    POINT_GROUP_RANGES
        .iter()
        .find(|(lo, hi, _, _)| (*lo..=*hi).contains(&number))
        .map(|(_, _, symbol, _)| *symbol)
}

/// Schoenflies symbol, e.g. `Oh^5` for 225
pub fn schoenflies(number: i32) -> Option<String> {
    POINT_GROUP_RANGES
        .iter()
        .find(|(lo, hi, _, _)| (*lo..=*hi).contains(&number))
        .map(|(lo, _, _, sch)| format!("{}^{}", sch, number - lo + 1))
}
